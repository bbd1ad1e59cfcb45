use std::collections::BTreeMap;

use crate::RejectionSummary;
use crate::protocols::{PacketError, RejectionClass};

const MAX_EXAMPLES: usize = 3;

#[derive(Debug)]
struct RejectionStats {
    class: RejectionClass,
    summary: &'static str,
    count: u64,
    examples: Vec<String>,
}

/// Aggregates rejections by stable id.
#[derive(Debug, Default)]
pub(crate) struct RejectionTally {
    by_id: BTreeMap<&'static str, RejectionStats>,
}

impl RejectionTally {
    pub(crate) fn add(&mut self, offset: u64, error: &PacketError) {
        let entry = self.by_id.entry(error.id()).or_insert_with(|| RejectionStats {
            class: error.class(),
            summary: error.summary(),
            count: 0,
            examples: Vec::new(),
        });
        entry.count += 1;
        if entry.examples.len() < MAX_EXAMPLES {
            entry.examples.push(format!("offset {offset}: {error}"));
        }
    }

    /// Summaries ordered by class, then id.
    pub(crate) fn into_summaries(self) -> Vec<RejectionSummary> {
        let mut summaries: Vec<RejectionSummary> = self
            .by_id
            .into_iter()
            .map(|(id, stats)| RejectionSummary {
                id: id.to_string(),
                class: stats.class,
                message: stats.summary.to_string(),
                count: stats.count,
                examples: stats.examples,
            })
            .collect();
        summaries.sort_by(|a, b| a.class.cmp(&b.class).then_with(|| a.id.cmp(&b.id)));
        summaries
    }
}

#[cfg(test)]
mod tests {
    use super::RejectionTally;
    use crate::protocols::bm25x::error::Bm25xError;
    use crate::protocols::es519xx::error::Es519xxError;
    use crate::protocols::{PacketError, RejectionClass};

    #[test]
    fn tally_caps_examples_and_counts_all() {
        let mut tally = RejectionTally::default();
        for offset in 0..5 {
            tally.add(offset * 15, &PacketError::from(Bm25xError::AcAndDc));
        }
        let summaries = tally.into_summaries();
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].id, "DMM-FLAGS-AC-DC");
        assert_eq!(summaries[0].count, 5);
        assert_eq!(summaries[0].examples.len(), 3);
        assert_eq!(summaries[0].examples[1], "offset 15: bm25x: both AC and DC flags set");
    }

    #[test]
    fn summaries_sorted_by_class_then_id() {
        let mut tally = RejectionTally::default();
        tally.add(0, &PacketError::from(Es519xxError::InvalidRange { value: b'9' }));
        tally.add(1, &PacketError::from(Es519xxError::MultipleMultipliers));
        tally.add(2, &PacketError::from(Es519xxError::AcAndDc));
        let summaries = tally.into_summaries();
        let ids: Vec<_> = summaries.iter().map(|summary| summary.id.as_str()).collect();
        assert_eq!(
            ids,
            vec!["DMM-FLAGS-AC-DC", "DMM-FLAGS-MULTIPLE-MULTIPLIERS", "DMM-VALUE-RANGE"]
        );
        assert_eq!(summaries[2].class, RejectionClass::Decode);
    }
}
