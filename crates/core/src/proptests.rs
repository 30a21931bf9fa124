//! Property-based tests for the canonical container and parameter access.

use std::collections::BTreeSet;

use proptest::prelude::*;

use crate::{Name, SymbolCache, SymbolicIndexing, getp, setp};

/// Splits a set of unique names into three disjoint lists.
fn disjoint_lists() -> impl Strategy<Value = (Vec<Name>, Vec<Name>, Vec<Name>)> {
    (
        prop::collection::btree_set("[a-z]{1,4}", 0..24),
        prop::collection::vec(0_u8..3, 24),
    )
        .prop_map(|(names, buckets): (BTreeSet<String>, Vec<u8>)| {
            let mut lists = (Vec::new(), Vec::new(), Vec::new());
            for (name, bucket) in names.into_iter().zip(buckets) {
                let name = Name::from(name);
                match bucket {
                    0 => lists.0.push(name),
                    1 => lists.1.push(name),
                    _ => lists.2.push(name),
                }
            }
            lists
        })
}

proptest! {
    #[test]
    fn lists_are_returned_in_order((v, p, i) in disjoint_lists()) {
        let cache = SymbolCache::from_parts(v.clone(), p.clone(), i.clone());

        let (vars, params, ivs) = (
            cache.variable_symbols(),
            cache.parameter_symbols(),
            cache.independent_variable_symbols(),
        );
        prop_assert_eq!(vars.as_ref(), v.as_slice());
        prop_assert_eq!(params.as_ref(), p.as_slice());
        prop_assert_eq!(ivs.as_ref(), i.as_slice());
        prop_assert_eq!(cache.is_time_dependent(), !i.is_empty());
        prop_assert!(cache.constant_structure());
    }

    #[test]
    fn indices_match_positions((v, p, i) in disjoint_lists()) {
        let cache = SymbolCache::from_parts(v.clone(), p.clone(), i);

        for (index, sym) in v.iter().enumerate() {
            prop_assert!(cache.is_variable(sym));
            prop_assert_eq!(cache.variable_index(sym), Some(index));
            prop_assert!(!cache.is_parameter(sym));
        }
        for (index, sym) in p.iter().enumerate() {
            prop_assert!(cache.is_parameter(sym));
            prop_assert_eq!(cache.parameter_index(sym), Some(index));
            prop_assert!(!cache.is_variable(sym));
        }
    }

    #[test]
    fn strangers_are_never_found((v, p, i) in disjoint_lists()) {
        let cache = SymbolCache::from_parts(v, p, i);
        // Generated names are lowercase letters only.
        let stranger = Name::from("Z9");

        prop_assert!(!cache.is_variable(&stranger));
        prop_assert!(!cache.is_parameter(&stranger));
        prop_assert!(!cache.is_independent_variable(&stranger));
        prop_assert!(!cache.is_observed(&stranger));
        prop_assert_eq!(cache.variable_index(&stranger), None);
        prop_assert_eq!(cache.parameter_index(&stranger), None);
    }

    #[test]
    fn all_symbols_is_the_ordered_union((v, p, i) in disjoint_lists()) {
        let cache = SymbolCache::from_parts(v.clone(), p.clone(), i.clone());

        let expected: Vec<Name> = v.into_iter().chain(p).chain(i).collect();
        let all = cache.all_symbols();

        prop_assert_eq!(all.as_ref(), expected.as_slice());
        let unique: BTreeSet<&Name> = all.iter().collect();
        prop_assert_eq!(unique.len(), all.len());
    }

    #[test]
    fn setp_then_getp_round_trips(
        values in prop::collection::vec(-1e6_f64..1e6, 1..12),
        pick in any::<prop::sample::Index>(),
        value in -1e6_f64..1e6,
    ) {
        let params: Vec<Name> = (0..values.len()).map(|k| Name::from(format!("p{k}"))).collect();
        let cache = SymbolCache::new([Name::from("x")]).with_parameters(params.clone());
        let sym = pick.get(&params);
        let mut ctx = values;

        setp(&cache, sym).unwrap().set(&mut ctx, value).unwrap();

        prop_assert_eq!(getp(&cache, sym).unwrap().get(&ctx).unwrap(), value);
    }
}
