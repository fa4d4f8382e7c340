//! Structural invariants of the clustering pass under generated inputs.

use canon_cluster::{analyze_isolated, ClusterEngine};
use canon_core::config::{PatternConfig, PatternTable};
use canon_core::types::collections::FxHashSet;
use canon_core::LabelCount;
use proptest::prelude::*;

fn table() -> PatternTable {
    let json = r#"{
        "prefix_patterns": {
            "modality": { "visual": ["image", "depth"], "audio": ["speech", "sound"] }
        },
        "suffix_patterns": {
            "data_format": { "mask": ["mask", "map"] }
        },
        "high_frequency_patterns": {
            "prefixes": { "rgb": 412 },
            "suffixes": { "data": 2105 }
        }
    }"#;
    PatternTable::compile(&PatternConfig::from_json_str(json).unwrap()).unwrap()
}

/// Distinct labels drawn from a small token pool so the rule tiers actually
/// fire, with arbitrary frequencies.
fn label_counts() -> impl Strategy<Value = Vec<LabelCount>> {
    let label = "(rgb|image|depth|speech|sensor|raw|xyz)(_(data|map|mask|scan|set|cloud))?";
    prop::collection::hash_map(label, 0u64..1_000, 0..24).prop_map(|entries| {
        entries
            .into_iter()
            .map(|(label, frequency)| LabelCount::new(label, frequency))
            .collect()
    })
}

proptest! {
    #[test]
    fn clusters_partition_the_input(labels in label_counts()) {
        let table = table();
        let set = ClusterEngine::with_default_threshold(&table).build(&labels);

        let input: FxHashSet<&str> = labels.iter().map(|l| l.label.as_str()).collect();
        let mut seen: FxHashSet<&str> = FxHashSet::default();
        for cluster in &set.clusters {
            prop_assert!(cluster.members.len() >= 2);
            for member in &cluster.members {
                prop_assert!(input.contains(member.name.as_str()));
                prop_assert!(seen.insert(member.name.as_str()), "label in two clusters");
            }
        }

        let isolated = analyze_isolated(&labels, &set);
        prop_assert_eq!(set.clustered_labels() + isolated.total_isolated, labels.len());
    }

    #[test]
    fn frequency_is_conserved(labels in label_counts()) {
        let table = table();
        let set = ClusterEngine::with_default_threshold(&table).build(&labels);

        for cluster in &set.clusters {
            let member_sum: u64 = cluster.members.iter().map(|m| m.frequency).sum();
            prop_assert_eq!(cluster.total_frequency, member_sum);
        }

        let isolated = analyze_isolated(&labels, &set);
        let input_total: u64 = labels.iter().map(|l| l.frequency).sum();
        prop_assert_eq!(set.clustered_frequency() + isolated.total_frequency, input_total);
    }

    #[test]
    fn result_is_independent_of_input_order(labels in label_counts()) {
        let table = table();
        let engine = ClusterEngine::with_default_threshold(&table);

        let mut reversed = labels.clone();
        reversed.reverse();
        prop_assert_eq!(engine.build(&labels), engine.build(&reversed));
    }

    #[test]
    fn cluster_key_leads_its_members(labels in label_counts()) {
        let table = table();
        let set = ClusterEngine::with_default_threshold(&table).build(&labels);

        for cluster in &set.clusters {
            prop_assert_eq!(&cluster.key, &cluster.members[0].name);
            let max = cluster.members.iter().map(|m| m.frequency).max().unwrap_or(0);
            prop_assert_eq!(cluster.members[0].frequency, max);
        }
    }
}
