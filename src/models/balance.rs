//! Balance display models

/// Movement of the wallet balance between two snapshots
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BalanceTrend {
    Up,
    Down,
    Unchanged,
}

impl BalanceTrend {
    pub fn arrow(&self) -> &'static str {
        match self {
            BalanceTrend::Up => "▲",
            BalanceTrend::Down => "▼",
            BalanceTrend::Unchanged => "",
        }
    }
}
