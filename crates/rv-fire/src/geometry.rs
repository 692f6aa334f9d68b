//! Vessel geometry and wetted surface area.
//!
//! Heads are treated as surfaces of revolution: an ellipsoid with radial
//! semi-axis `a = D/2` and axial depth `c` (hemispherical `c = a`, 2:1
//! elliptical `c = a/2`), or a flat plate. Curved head areas are integrated
//! numerically over the meridian angle θ measured from the head apex:
//!
//! `dA = a·sinθ · √(a²cos²θ + c²sin²θ) · Φ(θ) dθ`
//!
//! where Φ is the wetted azimuth of the ring at θ (2π for a vertical axis).

use std::f64::consts::PI;

use rv_core::units::{Area, Length, m, m2};

use crate::error::{FireResult, require_non_negative, require_positive};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VesselOrientation {
    #[default]
    Vertical,
    Horizontal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HeadType {
    Hemispherical,
    /// 2:1 semi-elliptical
    #[default]
    Ellipsoidal,
    Flat,
}

impl HeadType {
    /// Axial depth of the head for a vessel of radius `radius`.
    pub fn depth(self, radius: f64) -> f64 {
        match self {
            HeadType::Hemispherical => radius,
            HeadType::Ellipsoidal => 0.5 * radius,
            HeadType::Flat => 0.0,
        }
    }
}

/// Vessel shape. `length` is tangent-to-tangent: the shell height of a
/// vertical vessel or the shell length of a horizontal one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vessel {
    pub orientation: VesselOrientation,
    pub head: HeadType,
    /// Inner diameter
    pub diameter: Length,
    pub length: Length,
}

impl Vessel {
    pub fn new(orientation: VesselOrientation, head: HeadType, diameter: Length, length: Length) -> Self {
        Self {
            orientation,
            head,
            diameter,
            length,
        }
    }

    pub fn check(&self) -> FireResult<()> {
        require_positive(self.diameter.value, "vessel diameter")?;
        require_non_negative(self.length.value, "vessel length")
    }

    fn radius(&self) -> f64 {
        0.5 * self.diameter.value
    }

    fn head_depth(&self) -> f64 {
        self.head.depth(self.radius())
    }

    /// Height of the liquid space from the vessel bottom to its top.
    pub fn internal_height(&self) -> Length {
        match self.orientation {
            VesselOrientation::Vertical => m(self.length.value + 2.0 * self.head_depth()),
            VesselOrientation::Horizontal => self.diameter,
        }
    }

    fn full_head_area(&self, panels: usize) -> f64 {
        let a = self.radius();
        let c = self.head_depth();
        if c == 0.0 {
            PI * a * a
        } else {
            axial_cap(a, c, c, panels)
        }
    }

    /// Area below `level`, measured from the vessel bottom. Levels outside
    /// the vessel are clamped.
    pub fn area_below(&self, level: Length, panels: usize) -> Area {
        let z = level.value.clamp(0.0, self.internal_height().value);
        let area = match self.orientation {
            VesselOrientation::Vertical => self.vertical_area(z, panels),
            VesselOrientation::Horizontal => self.horizontal_area(z, panels),
        };
        m2(area)
    }

    fn vertical_area(&self, z: f64, panels: usize) -> f64 {
        let a = self.radius();
        let c = self.head_depth();
        let len = self.length.value;
        let top = len + 2.0 * c;

        let full = self.full_head_area(panels);
        let (bottom, top_head) = if c == 0.0 {
            (if z > 0.0 { full } else { 0.0 }, if z >= top { full } else { 0.0 })
        } else {
            let rise = z - c - len;
            let top_head = if rise > 0.0 {
                full - axial_cap(a, c, c - rise, panels)
            } else {
                0.0
            };
            (axial_cap(a, c, z, panels), top_head)
        };
        let shell = PI * self.diameter.value * (z - c).clamp(0.0, len);
        bottom + shell + top_head
    }

    fn horizontal_area(&self, z: f64, panels: usize) -> f64 {
        let a = self.radius();
        let c = self.head_depth();
        let d = self.diameter.value;
        let shell = d * (1.0 - 2.0 * z / d).clamp(-1.0, 1.0).acos() * self.length.value;

        let head = if c == 0.0 {
            let h = a - z;
            a * a * (h / a).clamp(-1.0, 1.0).acos() - h * (2.0 * a * z - z * z).max(0.0).sqrt()
        } else {
            simpson(
                |theta| {
                    let r = a * theta.sin();
                    if r <= 0.0 {
                        return 0.0;
                    }
                    let wetted = 2.0 * ((a - z) / r).clamp(-1.0, 1.0).acos();
                    r * meridian(a, c, theta) * wetted
                },
                0.0,
                0.5 * PI,
                panels,
            )
        };
        shell + 2.0 * head
    }
}

/// √(a²cos²θ + c²sin²θ): meridian arc length per radian.
fn meridian(a: f64, c: f64, theta: f64) -> f64 {
    ((a * theta.cos()).powi(2) + (c * theta.sin()).powi(2)).sqrt()
}

/// Area of an ellipsoidal head with vertical axis, from its apex up to
/// `depth` (clamped to the head depth `c`).
fn axial_cap(a: f64, c: f64, depth: f64, panels: usize) -> f64 {
    let y = depth.clamp(0.0, c);
    if y == 0.0 {
        return 0.0;
    }
    let theta_max = (1.0 - y / c).clamp(-1.0, 1.0).acos();
    simpson(
        |theta| 2.0 * PI * a * theta.sin() * meridian(a, c, theta),
        0.0,
        theta_max,
        panels,
    )
}

/// Composite Simpson rule; `panels` is rounded up to an even count.
fn simpson(f: impl Fn(f64) -> f64, lo: f64, hi: f64, panels: usize) -> f64 {
    if hi <= lo {
        return 0.0;
    }
    let n = (panels.max(2) + 1) & !1;
    let h = (hi - lo) / n as f64;
    let interior: f64 = (1..n)
        .map(|i| {
            let weight = if i % 2 == 1 { 4.0 } else { 2.0 };
            weight * f(lo + i as f64 * h)
        })
        .sum();
    (f(lo) + f(hi) + interior) * h / 3.0
}

/// Physical and credited wetted area of a vessel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WettedArea {
    /// Area below the liquid level
    pub physical: Area,
    /// Area below the lower of the liquid level and the credited height
    pub credited: Area,
    /// Level used for the credited area, from the vessel bottom
    pub credited_level: Length,
}

/// Wetted area for a liquid level measured from the vessel bottom.
///
/// `height_above_grade` is the elevation of the vessel bottom; only the
/// surface below `credited_height` above grade is credited.
pub fn wetted_area(
    vessel: &Vessel,
    liquid_level: Length,
    height_above_grade: Length,
    credited_height: Length,
    panels: usize,
) -> FireResult<WettedArea> {
    vessel.check()?;
    require_non_negative(liquid_level.value, "liquid level")?;
    require_non_negative(height_above_grade.value, "height above grade")?;

    let cap = (credited_height.value - height_above_grade.value).max(0.0);
    let credited_level = m(liquid_level.value.min(cap));
    Ok(WettedArea {
        physical: vessel.area_below(liquid_level, panels),
        credited: vessel.area_below(credited_level, panels),
        credited_level,
    })
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn head() -> impl Strategy<Value = HeadType> {
        prop_oneof![
            Just(HeadType::Hemispherical),
            Just(HeadType::Ellipsoidal),
            Just(HeadType::Flat)
        ]
    }

    proptest! {
        #[test]
        fn level_above_cap_equals_cap(
            head in head(),
            d in 0.5_f64..5.0,
            len in 1.0_f64..20.0,
            level in 7.6_f64..30.0,
        ) {
            let v = Vessel::new(VesselOrientation::Vertical, head, m(d), m(len));
            let above = wetted_area(&v, m(level), m(0.0), m(7.6), 200).unwrap();
            let at = wetted_area(&v, m(7.6), m(0.0), m(7.6), 200).unwrap();
            prop_assert_eq!(above.credited, at.credited);
        }

        #[test]
        fn area_is_monotone_in_level(
            head in head(),
            horizontal in any::<bool>(),
            d in 0.5_f64..5.0,
            len in 1.0_f64..20.0,
            f1 in 0.0_f64..1.0,
            f2 in 0.0_f64..1.0,
        ) {
            let orientation = if horizontal { VesselOrientation::Horizontal } else { VesselOrientation::Vertical };
            let v = Vessel::new(orientation, head, m(d), m(len));
            let h = v.internal_height().value;
            let (lo, hi) = if f1 <= f2 { (f1, f2) } else { (f2, f1) };
            let a = v.area_below(m(lo * h), 200).value;
            let b = v.area_below(m(hi * h), 200).value;
            let total = v.area_below(v.internal_height(), 200).value;
            prop_assert!(b + 1e-6 * (1.0 + a) >= a);
            prop_assert!(b <= total + 1e-6 * (1.0 + total));
        }
    }
}
