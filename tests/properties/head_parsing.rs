use proptest::prelude::*;

use rj::discovery::BranchError;
use rj::discovery::head::parse_head;

proptest! {
    #[test]
    fn parse_head_never_panics(input in ".*") {
        let _ = parse_head(&input);
    }

    #[test]
    fn parse_head_arbitrary_bytes(bytes in prop::collection::vec(any::<u8>(), 0..512)) {
        let input = String::from_utf8_lossy(&bytes);
        let _ = parse_head(&input);
    }

    #[test]
    fn symbolic_refs_round_trip(name in "[A-Za-z0-9._/-]{1,40}", newline in prop_oneof![Just(""), Just("\n"), Just("\r\n")]) {
        let trimmed = name.trim();
        prop_assume!(!trimmed.is_empty());
        let branch = parse_head(&format!("ref: refs/heads/{name}{newline}")).unwrap();
        prop_assert_eq!(branch.as_str(), trimmed);
    }

    #[test]
    fn successful_names_are_trimmed_and_non_empty(input in ".*") {
        if let Ok(branch) = parse_head(&input) {
            prop_assert!(!branch.is_empty());
            prop_assert_eq!(branch.trim(), branch.as_str());
        }
    }

    #[test]
    fn object_ids_are_detached(id in "[0-9a-f]{40}") {
        let err = parse_head(&format!("{id}\n")).unwrap_err();
        prop_assert!(matches!(err, BranchError::Detached { commit } if commit == id), "unexpected error");
    }
}
