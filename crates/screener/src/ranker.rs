use crate::error::ScreenerError;
use configuration::RankingConfig;
use core_types::UniverseEntry;

/// Orders filtered entries by recent performance and keeps the top of the list.
#[derive(Debug, Clone, Default)]
pub struct CandidateRanker {
    config: RankingConfig,
}

impl CandidateRanker {
    pub fn new(config: RankingConfig) -> Self {
        Self { config }
    }

    pub fn max_candidates(&self) -> usize {
        self.config.max_candidates
    }

    /// Sorts by `change_percent` descending and truncates to the configured bound.
    ///
    /// The sort is stable, so entries with equal change keep their filter order.
    /// `universe_size` is only used to make the empty-result error descriptive.
    pub fn rank(
        &self,
        mut filtered: Vec<UniverseEntry>,
        universe_size: usize,
    ) -> Result<Vec<UniverseEntry>, ScreenerError> {
        if filtered.is_empty() {
            return Err(ScreenerError::NoCandidates { universe_size });
        }

        filtered.sort_by(|a, b| b.change_percent.cmp(&a.change_percent));
        filtered.truncate(self.config.max_candidates);

        tracing::info!(
            candidates = filtered.len(),
            max_candidates = self.config.max_candidates,
            "Ranked candidates by change percent."
        );

        Ok(filtered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn entry(symbol: &str, change: Decimal) -> UniverseEntry {
        UniverseEntry {
            symbol: symbol.to_string(),
            name: format!("ETF {symbol}"),
            last_price: dec!(1.5),
            change_percent: change,
            turnover_amount: dec!(5000),
        }
    }

    #[test]
    fn empty_input_means_no_candidates() {
        let err = CandidateRanker::default().rank(vec![], 12).unwrap_err();
        assert_eq!(err, ScreenerError::NoCandidates { universe_size: 12 });
    }

    #[test]
    fn ties_keep_their_original_order() {
        let ranked = CandidateRanker::default()
            .rank(
                vec![
                    entry("A", dec!(1.5)),
                    entry("B", dec!(3.0)),
                    entry("C", dec!(1.5)),
                    entry("D", dec!(-0.4)),
                    entry("E", dec!(3.0)),
                ],
                5,
            )
            .unwrap();
        let symbols: Vec<&str> = ranked.iter().map(|e| e.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["B", "E", "A", "C", "D"]);
    }

    #[test]
    fn default_bound_is_fifty() {
        let entries: Vec<UniverseEntry> = (0..80)
            .map(|i| entry(&format!("S{i}"), Decimal::from(i)))
            .collect();
        let ranked = CandidateRanker::default().rank(entries, 80).unwrap();
        assert_eq!(ranked.len(), 50);
        assert_eq!(ranked[0].symbol, "S79");
        assert_eq!(ranked[49].symbol, "S30");
    }

    proptest! {
        #[test]
        fn output_is_non_increasing_stable_and_bounded(
            changes in prop::collection::vec(-1000i64..1000, 1..120),
            bound in 1usize..70,
        ) {
            let entries: Vec<UniverseEntry> = changes
                .iter()
                .enumerate()
                .map(|(i, c)| entry(&i.to_string(), Decimal::new(*c, 2)))
                .collect();
            let ranker = CandidateRanker::new(RankingConfig { max_candidates: bound });
            let ranked = ranker.rank(entries.clone(), entries.len()).unwrap();

            prop_assert!(ranked.len() <= bound);
            prop_assert_eq!(ranked.len(), entries.len().min(bound));
            for pair in ranked.windows(2) {
                prop_assert!(pair[0].change_percent >= pair[1].change_percent);
                if pair[0].change_percent == pair[1].change_percent {
                    let a: usize = pair[0].symbol.parse().unwrap();
                    let b: usize = pair[1].symbol.parse().unwrap();
                    prop_assert!(a < b);
                }
            }
        }
    }
}
