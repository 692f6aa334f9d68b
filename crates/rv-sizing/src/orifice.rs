//! Standard orifice tables and selection.

use rv_core::units::{Area, mm2};

use crate::error::{SizingError, SizingResult};

/// One standard orifice size.
#[derive(Debug, Clone, PartialEq)]
pub struct Orifice {
    /// Letter designation
    pub designation: String,
    /// Effective flow area
    pub area: Area,
}

impl Orifice {
    pub fn new(designation: impl Into<String>, area: Area) -> Self {
        Self {
            designation: designation.into(),
            area,
        }
    }
}

/// Standard orifice sizes, strictly ascending by area with unique designations.
#[derive(Debug, Clone, PartialEq)]
pub struct OrificeTable {
    entries: Vec<Orifice>,
}

/// API 526 effective orifice areas [mm²].
const API_526: [(&str, f64); 14] = [
    ("D", 71.0),
    ("E", 126.0),
    ("F", 198.0),
    ("G", 325.0),
    ("H", 506.0),
    ("J", 830.0),
    ("K", 1186.0),
    ("L", 1841.0),
    ("M", 2323.0),
    ("N", 2800.0),
    ("P", 4116.0),
    ("Q", 7129.0),
    ("R", 10323.0),
    ("T", 16774.0),
];

impl OrificeTable {
    /// Build a table, checking ordering and uniqueness.
    pub fn new(entries: Vec<Orifice>) -> SizingResult<Self> {
        if entries.is_empty() {
            return Err(SizingError::InvalidOrificeTable {
                what: "table is empty",
            });
        }
        if entries
            .iter()
            .any(|o| !(o.area.value.is_finite() && o.area.value > 0.0))
        {
            return Err(SizingError::InvalidOrificeTable {
                what: "areas must be positive",
            });
        }
        if entries.windows(2).any(|w| w[1].area <= w[0].area) {
            return Err(SizingError::InvalidOrificeTable {
                what: "areas must be strictly ascending",
            });
        }
        for (i, a) in entries.iter().enumerate() {
            if entries[i + 1..].iter().any(|b| b.designation == a.designation) {
                return Err(SizingError::InvalidOrificeTable {
                    what: "designations must be unique",
                });
            }
        }
        Ok(Self { entries })
    }

    pub fn api526() -> Self {
        Self {
            entries: API_526
                .iter()
                .map(|&(designation, area)| Orifice::new(designation, mm2(area)))
                .collect(),
        }
    }

    pub fn entries(&self) -> &[Orifice] {
        &self.entries
    }

    pub fn largest(&self) -> &Orifice {
        // Construction guarantees at least one entry.
        &self.entries[self.entries.len() - 1]
    }

    pub fn get(&self, designation: &str) -> Option<&Orifice> {
        self.entries
            .iter()
            .find(|o| o.designation.eq_ignore_ascii_case(designation))
    }
}

impl Default for OrificeTable {
    fn default() -> Self {
        Self::api526()
    }
}

/// An orifice chosen for a required area split over one or more valves.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub orifice: Orifice,
    pub number_of_valves: u32,
    /// Total required area divided evenly across the valves
    pub required_per_valve: Area,
    /// Chosen by designation rather than by scanning the table
    pub manual: bool,
}

impl Selection {
    /// Per-valve required area as a percentage of the orifice area.
    pub fn percent_utilized(&self) -> f64 {
        self.required_per_valve.value / self.orifice.area.value * 100.0
    }

    /// The orifice is smaller than the per-valve requirement.
    pub fn is_undersized(&self) -> bool {
        self.required_per_valve > self.orifice.area
    }

    /// Installed area of all valves together.
    pub fn installed_area(&self) -> Area {
        self.orifice.area * f64::from(self.number_of_valves)
    }
}

fn per_valve(required_area: Area, number_of_valves: u32) -> SizingResult<Area> {
    if number_of_valves == 0 {
        return Err(SizingError::InvalidValveCount);
    }
    Ok(required_area / f64::from(number_of_valves))
}

/// Smallest orifice whose area covers the per-valve requirement, or the
/// largest orifice when none does.
pub fn select(
    required_area: Area,
    number_of_valves: u32,
    table: &OrificeTable,
) -> SizingResult<Selection> {
    let required_per_valve = per_valve(required_area, number_of_valves)?;
    let orifice = table
        .entries
        .iter()
        .find(|o| o.area >= required_per_valve)
        .unwrap_or_else(|| table.largest())
        .clone();
    Ok(Selection {
        orifice,
        number_of_valves,
        required_per_valve,
        manual: false,
    })
}

/// Use a caller-chosen orifice.
pub fn select_manual(
    designation: &str,
    required_area: Area,
    number_of_valves: u32,
    table: &OrificeTable,
) -> SizingResult<Selection> {
    let required_per_valve = per_valve(required_area, number_of_valves)?;
    let orifice = table
        .get(designation)
        .ok_or_else(|| SizingError::UnknownOrifice {
            designation: designation.to_string(),
        })?
        .clone();
    Ok(Selection {
        orifice,
        number_of_valves,
        required_per_valve,
        manual: true,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rv_core::units::area_mm2;

    #[test]
    fn api526_is_valid_table() {
        let table = OrificeTable::api526();
        assert!(OrificeTable::new(table.entries().to_vec()).is_ok());
        assert_eq!(table.entries().len(), 14);
        assert_eq!(table.largest().designation, "T");
    }

    #[test]
    fn selects_smallest_covering_entry() {
        let table = OrificeTable::api526();
        let sel = select(mm2(780.3), 1, &table).unwrap();
        assert_eq!(sel.orifice.designation, "J");
        assert!((sel.percent_utilized() - 780.3 / 830.0 * 100.0).abs() < 1e-9);

        let exact = select(mm2(830.0), 1, &table).unwrap();
        assert_eq!(exact.orifice.designation, "J");
    }

    #[test]
    fn oversize_returns_largest() {
        let table = OrificeTable::api526();
        let sel = select(mm2(20_000.0), 1, &table).unwrap();
        assert_eq!(sel.orifice.designation, "T");
        assert!(sel.is_undersized());
    }

    #[test]
    fn splits_across_valves() {
        let table = OrificeTable::api526();
        let sel = select(mm2(1600.0), 2, &table).unwrap();
        assert_eq!(sel.orifice.designation, "J");
        assert!((area_mm2(sel.required_per_valve) - 800.0).abs() < 1e-9);
        assert!((area_mm2(sel.installed_area()) - 1660.0).abs() < 1e-9);
    }

    #[test]
    fn zero_valves_rejected() {
        let table = OrificeTable::api526();
        assert_eq!(
            select(mm2(100.0), 0, &table),
            Err(SizingError::InvalidValveCount)
        );
    }

    #[test]
    fn manual_override() {
        let table = OrificeTable::api526();
        let sel = select_manual("h", mm2(600.0), 1, &table).unwrap();
        assert_eq!(sel.orifice.designation, "H");
        assert!(sel.manual);
        assert!(sel.is_undersized());
        assert!(select_manual("Z", mm2(600.0), 1, &table).is_err());
    }

    #[test]
    fn table_rejects_unordered() {
        let bad = vec![Orifice::new("A", mm2(200.0)), Orifice::new("B", mm2(100.0))];
        assert!(OrificeTable::new(bad).is_err());
        let dup = vec![Orifice::new("A", mm2(100.0)), Orifice::new("A", mm2(200.0))];
        assert!(OrificeTable::new(dup).is_err());
    }
}
