// Valuation: raw measurements to comparable 0-100 scores.

pub mod normalize;
