use bazaar_types::{Amount, ItemId};

use crate::events::{MarketEvent, MarketEventKind};
use crate::snapshot::CatalogSnapshot;

/// Result of catalog validation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidationReport {
    pub item_count: u64,
    pub ids_dense: bool,
    pub prices_positive: bool,
    pub journal_sequential: bool,
    pub fees_reconciled: bool,
    pub violations: Vec<Violation>,
}

impl ValidationReport {
    /// Returns `true` if all checks passed.
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }
}

/// A specific invariant violation detected during validation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Violation {
    pub item: Option<ItemId>,
    pub kind: ViolationKind,
    pub description: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ViolationKind {
    IdGap,
    CountMismatch,
    ZeroPrice,
    JournalGap,
    FeeMismatch,
}

/// Catalog and journal invariant checker.
pub struct CatalogValidator;

impl CatalogValidator {
    pub fn validate(snapshot: &CatalogSnapshot, journal: &[MarketEvent]) -> ValidationReport {
        let mut violations = Vec::new();
        let mut ids_dense = true;
        let mut prices_positive = true;
        let mut journal_sequential = true;

        let mut stored = 0u64;
        for (index, item) in snapshot.items().enumerate() {
            stored += 1;
            let expected = ItemId::new(index as u64 + 1);
            if item.id != expected {
                ids_dense = false;
                violations.push(Violation {
                    item: Some(item.id),
                    kind: ViolationKind::IdGap,
                    description: format!("expected id {expected}, found {}", item.id),
                });
            }
            if item.price().is_zero() {
                prices_positive = false;
                violations.push(Violation {
                    item: Some(item.id),
                    kind: ViolationKind::ZeroPrice,
                    description: "item has a zero price".into(),
                });
            }
        }

        if stored != snapshot.item_count() {
            ids_dense = false;
            violations.push(Violation {
                item: None,
                kind: ViolationKind::CountMismatch,
                description: format!(
                    "counter says {} items, catalog holds {stored}",
                    snapshot.item_count()
                ),
            });
        }

        for (index, event) in journal.iter().enumerate() {
            let expected = index as u64 + 1;
            if event.seq != expected {
                journal_sequential = false;
                violations.push(Violation {
                    item: event.kind.item(),
                    kind: ViolationKind::JournalGap,
                    description: format!("expected event seq {expected}, got {}", event.seq),
                });
            }
        }

        let expected_balance = replay_operator_balance(journal);
        let fees_reconciled = expected_balance == Some(snapshot.operator_balance());
        if !fees_reconciled {
            violations.push(Violation {
                item: None,
                kind: ViolationKind::FeeMismatch,
                description: format!(
                    "operator balance is {}, journal implies {}",
                    snapshot.operator_balance(),
                    expected_balance.map_or_else(|| "an overflow".to_string(), |a| a.to_string())
                ),
            });
        }

        ValidationReport {
            item_count: snapshot.item_count(),
            ids_dense,
            prices_positive,
            journal_sequential,
            fees_reconciled,
            violations,
        }
    }
}

/// Fees collected minus fees withdrawn, or `None` on arithmetic failure.
fn replay_operator_balance(journal: &[MarketEvent]) -> Option<Amount> {
    journal.iter().try_fold(Amount::ZERO, |balance, event| {
        match &event.kind {
            MarketEventKind::FeesWithdrawn { amount, .. } => balance.checked_sub(*amount),
            kind => match kind.fee_collected() {
                Some(fee) => balance.checked_add(fee),
                None => Some(balance),
            },
        }
    })
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use bazaar_types::AccountId;

    use super::*;
    use crate::records::{Item, ItemState};

    fn snapshot(ids: &[u64], item_count: u64, balance: Amount) -> CatalogSnapshot {
        let seller = AccountId::from_label("seller");
        let items: BTreeMap<ItemId, Item> = ids
            .iter()
            .map(|raw| {
                let id = ItemId::new(*raw);
                (
                    id,
                    Item {
                        id,
                        creator: seller,
                        resource_uri: String::new(),
                        state: ItemState::Listed {
                            seller,
                            price: Amount::units(1),
                        },
                    },
                )
            })
            .collect();
        CatalogSnapshot {
            items,
            item_count,
            listing_fee: Amount::units(1),
            operator: AccountId::from_label("operator"),
            operator_balance: balance,
        }
    }

    fn listed(seq: u64, raw: u64) -> MarketEvent {
        MarketEvent::new(
            seq,
            MarketEventKind::Listed {
                id: ItemId::new(raw),
                creator: AccountId::from_label("seller"),
                price: Amount::units(1),
                fee: Amount::units(1),
            },
        )
    }

    #[test]
    fn consistent_catalog_is_valid() {
        let journal = vec![listed(1, 1), listed(2, 2)];
        let report = CatalogValidator::validate(&snapshot(&[1, 2], 2, Amount::units(2)), &journal);
        assert!(report.is_valid());
        assert_eq!(report.item_count, 2);
    }

    #[test]
    fn detects_id_gap_and_count_mismatch() {
        let journal = vec![listed(1, 1), listed(2, 3)];
        let report = CatalogValidator::validate(&snapshot(&[1, 3], 3, Amount::units(2)), &journal);
        assert!(!report.ids_dense);
        let kinds: Vec<_> = report.violations.iter().map(|v| v.kind.clone()).collect();
        assert_eq!(kinds, vec![ViolationKind::IdGap, ViolationKind::CountMismatch]);
    }

    #[test]
    fn detects_journal_gap() {
        let journal = vec![listed(1, 1), listed(3, 2)];
        let report = CatalogValidator::validate(&snapshot(&[1, 2], 2, Amount::units(2)), &journal);
        assert!(!report.journal_sequential);
        assert_eq!(report.violations[0].kind, ViolationKind::JournalGap);
    }

    #[test]
    fn withdrawals_reduce_expected_balance() {
        let journal = vec![
            listed(1, 1),
            MarketEvent::new(
                2,
                MarketEventKind::FeesWithdrawn {
                    operator: AccountId::from_label("operator"),
                    amount: Amount::units(1),
                },
            ),
        ];
        let ok = CatalogValidator::validate(&snapshot(&[1], 1, Amount::ZERO), &journal);
        assert!(ok.fees_reconciled);

        let bad = CatalogValidator::validate(&snapshot(&[1], 1, Amount::units(1)), &journal);
        assert!(!bad.fees_reconciled);
        assert_eq!(bad.violations[0].kind, ViolationKind::FeeMismatch);
    }
}
