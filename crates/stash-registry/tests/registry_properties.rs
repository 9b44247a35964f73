//! Property tests: the registry behaves like a map keyed by type, and
//! every stored value is dropped exactly once.

use proptest::prelude::*;
use stash_registry::TypeIndexedMap;
use stash_test_utils::{DropTally, Large, Small};

#[derive(Clone, Debug)]
enum Op {
    InsertSmall(u32),
    InsertLarge(u64),
    InsertText(String),
    RemoveSmall,
    EraseLarge,
    Clear,
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        any::<u32>().prop_map(Op::InsertSmall),
        any::<u64>().prop_map(Op::InsertLarge),
        "[a-z]{0,12}".prop_map(Op::InsertText),
        Just(Op::RemoveSmall),
        Just(Op::EraseLarge),
        Just(Op::Clear),
    ]
}

proptest! {
    #[test]
    fn matches_a_model(ops in prop::collection::vec(arb_op(), 0..40)) {
        let mut registry = TypeIndexedMap::new();
        let mut small: Option<u32> = None;
        let mut large: Option<u64> = None;
        let mut text: Option<String> = None;

        for op in ops {
            match op {
                Op::InsertSmall(v) => {
                    registry.insert(Small(v));
                    small = Some(v);
                }
                Op::InsertLarge(v) => {
                    registry.insert(Large::filled(v));
                    large = Some(v);
                }
                Op::InsertText(s) => {
                    registry.insert(s.clone());
                    text = Some(s);
                }
                Op::RemoveSmall => {
                    prop_assert_eq!(registry.remove::<Small>().map(|s| s.0), small.take());
                }
                Op::EraseLarge => {
                    prop_assert_eq!(registry.erase::<Large>(), large.take().is_some());
                }
                Op::Clear => {
                    registry.clear();
                    small = None;
                    large = None;
                    text = None;
                }
            }
            prop_assert_eq!(registry.get::<Small>().map(|s| s.0), small);
            prop_assert_eq!(registry.get::<Large>().cloned(), large.map(Large::filled));
            prop_assert_eq!(registry.get::<String>(), text.as_ref());
            let expected_len =
                usize::from(small.is_some()) + usize::from(large.is_some()) + usize::from(text.is_some());
            prop_assert_eq!(registry.len(), expected_len);
        }
    }

    #[test]
    fn every_value_dropped_once(values in prop::collection::vec(any::<i16>(), 0..32)) {
        let tally = DropTally::new();
        let mut registry = TypeIndexedMap::new();
        for v in &values {
            registry.insert(tally.track(*v));
        }
        let replaced = values.len().saturating_sub(1);
        prop_assert_eq!(tally.drops(), replaced);
        drop(registry);
        prop_assert_eq!(tally.drops(), values.len());
    }
}
