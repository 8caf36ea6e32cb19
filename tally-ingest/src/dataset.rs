use std::collections::HashSet;
use tally_core::{build_report, SalesReport, Transaction};

/// Immutable, normalized transaction log
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dataset {
    transactions: Vec<Transaction>,
}

impl Dataset {
    pub fn new(transactions: Vec<Transaction>) -> Self {
        Self { transactions }
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    /// Distinct employee names in order of first appearance
    pub fn employees(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.transactions
            .iter()
            .map(|t| t.employee.as_str())
            .filter(|name| seen.insert(*name))
            .collect()
    }

    /// Report for one employee; `None` if they have no orders.
    pub fn report(&self, employee: &str) -> Option<SalesReport> {
        build_report(&self.transactions, employee)
    }
}
