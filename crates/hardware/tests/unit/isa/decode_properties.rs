//! Decoder property tests.

use pipesim_core::isa::decode::decode;
use proptest::prelude::*;

fn register() -> impl Strategy<Value = String> {
    (0u8..8).prop_map(|n| format!("R{n}"))
}

fn instruction_text() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("NOP".to_string()),
        (
            prop::sample::select(vec!["ADD", "SUB", "AND", "OR", "XOR"]),
            register(),
            register(),
            register()
        )
            .prop_map(|(op, d, a, b)| format!("{op} {d}, {a}, {b}")),
        (register(), register(), any::<i32>())
            .prop_map(|(d, a, imm)| format!("ADDI {d}, {a}, {imm}")),
        (register(), register(), -64i64..64)
            .prop_map(|(d, b, off)| format!("LOAD {d}, {off}({b})")),
        (register(), register(), 0i64..256)
            .prop_map(|(s, b, off)| format!("STORE {s}, {off}({b})")),
    ]
}

proptest! {
    #[test]
    fn arbitrary_text_never_panics(text in ".{0,40}") {
        let _ = decode(&text, 8);
    }

    #[test]
    fn canonical_text_is_a_fixed_point(text in instruction_text()) {
        let decoded = decode(&text, 8).unwrap();
        let canonical = decoded.to_string();
        prop_assert_eq!(decode(&canonical, 8), Ok(decoded));
        prop_assert_eq!(decode(&canonical, 8).unwrap().to_string(), canonical);
    }

    #[test]
    fn case_does_not_matter(text in instruction_text()) {
        prop_assert_eq!(decode(&text.to_lowercase(), 8), decode(&text, 8));
    }
}
