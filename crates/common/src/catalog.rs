//! Flights the catalog knows about out of the box.

/// Price quoted for any flight/day pair the catalog has no record of.
pub const FILLER_FLIGHT_VALUE: f64 = 500.00;

/// `(flight, day, value in dollars)` records every catalog starts with.
pub const SEED_FLIGHTS: [(&str, &str, f64); 6] = [
    ("AA100", "2025-01-15", 450.00),
    ("AA100", "2025-01-20", 480.00),
    ("UA200", "2025-01-15", 520.00),
    ("UA200", "2025-01-22", 550.00),
    ("DL300", "2025-02-10", 380.00),
    ("DL300", "2025-02-15", 400.00),
];
