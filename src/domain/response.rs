#[derive(Debug, Clone, PartialEq, Eq)]
/// Decoded account balance.
///
/// Mobily returns `total/remaining`; the ordering is vendor-defined and kept
/// as-is. Both sides stay strings since the gateway has been seen returning
/// non-integer unit counts.
pub struct Balance {
    pub total: String,
    pub remaining: String,
}
