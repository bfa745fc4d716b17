//! Shot power tables
//!
//! Empirical tables turn "how far must the shuttlecock travel" into the
//! racket angular speed (and, for short shots, an elevation correction).
//! Speeds are stored as multiples of π rad/s.

use std::f32::consts::PI;

/// Default damping applied to the interpolation fraction
pub const DEFAULT_DAMPING: f32 = 0.8;

/// One row of the side-link table
#[derive(Debug, Clone, Copy)]
pub struct ShotRow {
    /// Distance-from-net bucket (cm)
    pub distance: f32,
    /// Ascending (horizontal displacement, speed multiplier) breakpoints
    pub breakpoints: &'static [(f32, f32)],
    /// Short-shot corrections: (displacement, speed multiplier, elevation multiplier)
    pub near: &'static [(f32, f32, f32)],
}

/// Racket speed and elevation chosen for a shot
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShotPower {
    /// Racket angular speed (rad/s)
    pub angular_speed: f32,
    /// Multiplier on the link's base attack angle
    pub elevation: f32,
}

/// Side-link (left/right) table, ascending by distance from the net
pub static SHOT_TABLE: &[ShotRow] = &[
    ShotRow {
        distance: 0.0,
        breakpoints: &[
            (240.512, 4.0),
            (290.337, 5.0),
            (344.107, 6.0),
            (402.889, 7.0),
            (466.614, 8.0),
            (535.221, 9.0),
            (607.730, 10.0),
        ],
        near: &[(80.0, 1.6, 1.9), (130.0, 2.3, 1.6), (185.0, 3.1, 1.3)],
    },
    ShotRow {
        distance: 100.0,
        breakpoints: &[
            (275.066, 5.0),
            (324.661, 6.0),
            (378.902, 7.0),
            (437.551, 8.0),
            (500.342, 9.0),
            (567.004, 10.0),
            (637.281, 11.0),
        ],
        near: &[(110.0, 2.1, 1.8), (170.0, 2.9, 1.5), (225.0, 3.8, 1.25)],
    },
    ShotRow {
        distance: 200.0,
        breakpoints: &[
            (318.744, 6.0),
            (371.205, 7.0),
            (428.016, 8.0),
            (489.137, 9.0),
            (554.470, 10.0),
            (623.861, 11.0),
            (697.102, 12.0),
        ],
        near: &[(150.0, 2.8, 1.7), (215.0, 3.7, 1.45), (270.0, 4.6, 1.2)],
    },
    ShotRow {
        distance: 300.0,
        breakpoints: &[
            (360.218, 7.0),
            (416.930, 8.0),
            (477.654, 9.0),
            (542.289, 10.0),
            (610.701, 11.0),
            (682.733, 12.0),
        ],
        near: &[(190.0, 3.5, 1.6), (255.0, 4.5, 1.4), (310.0, 5.6, 1.2)],
    },
    ShotRow {
        distance: 400.0,
        breakpoints: &[
            (401.553, 8.0),
            (462.047, 9.0),
            (526.380, 10.0),
            (594.407, 11.0),
            (665.952, 12.0),
            (740.846, 13.0),
        ],
        near: &[(230.0, 4.3, 1.55), (295.0, 5.4, 1.35), (355.0, 6.6, 1.15)],
    },
    ShotRow {
        distance: 500.0,
        breakpoints: &[
            (446.091, 9.0),
            (509.774, 10.0),
            (577.156, 11.0),
            (648.083, 12.0),
            (722.365, 13.0),
        ],
        near: &[(270.0, 5.1, 1.5), (340.0, 6.3, 1.3), (400.0, 7.6, 1.12)],
    },
    ShotRow {
        distance: 600.0,
        breakpoints: &[
            (489.370, 10.0),
            (556.602, 11.0),
            (627.528, 12.0),
            (701.996, 13.0),
            (779.815, 14.0),
        ],
        near: &[(310.0, 5.9, 1.45), (380.0, 7.2, 1.28), (440.0, 8.5, 1.1)],
    },
];

/// Overhead-link table: (straight-line distance, speed multiplier)
pub static TOP_TABLE: &[(f32, f32)] = &[
    (281.455, 6.0),
    (352.019, 9.0),
    (432.837, 12.0),
    (508.317, 15.0),
    (590.264, 18.0),
    (676.920, 21.0),
    (768.503, 24.0),
];

/// Side-link shot power.
///
/// Picks the row with the largest distance bucket not above `net_distance`
/// (first row when below all buckets). Displacements shorter than the row's
/// first breakpoint use its near table; longer ones are interpolated with a
/// damped fraction and clamped at the last breakpoint.
pub fn side_shot(
    table: &[ShotRow],
    net_distance: f32,
    displacement: f32,
    damping: f32,
) -> Option<ShotPower> {
    let row = table
        .iter()
        .rev()
        .find(|row| row.distance <= net_distance)
        .or_else(|| table.first())?;

    let (&(first_x, _), rest) = row.breakpoints.split_first()?;
    if displacement < first_x {
        return near_shot(row.near, displacement).or(Some(ShotPower {
            angular_speed: PI * row.breakpoints[0].1,
            elevation: 1.0,
        }));
    }

    let mut prev = row.breakpoints[0];
    for &(x, speed) in rest {
        if displacement < x {
            let fraction = damping * (displacement - prev.0) / (x - prev.0);
            return Some(ShotPower {
                angular_speed: PI * (prev.1 + fraction * (speed - prev.1)),
                elevation: 1.0,
            });
        }
        prev = (x, speed);
    }

    Some(ShotPower {
        angular_speed: PI * prev.1,
        elevation: 1.0,
    })
}

/// Nearest near-table entry; ties go to the earlier entry
fn near_shot(near: &[(f32, f32, f32)], displacement: f32) -> Option<ShotPower> {
    let mut best: Option<&(f32, f32, f32)> = None;
    for entry in near {
        let closer = match best {
            Some(b) => (entry.0 - displacement).abs() < (b.0 - displacement).abs(),
            None => true,
        };
        if closer {
            best = Some(entry);
        }
    }
    best.map(|&(_, speed, elevation)| ShotPower {
        angular_speed: PI * speed,
        elevation,
    })
}

/// Overhead-link angular speed: the bracket just below the first breakpoint
/// beyond `distance` (a step function, no interpolation)
pub fn top_shot(table: &[(f32, f32)], distance: f32) -> Option<f32> {
    let mut speed = table.first()?.1;
    for &(x, s) in table {
        if x > distance {
            break;
        }
        speed = s;
    }
    Some(PI * speed)
}

#[cfg(test)]
mod tests {
    use super::*;

    static ROW_100: &[ShotRow] = &[ShotRow {
        distance: 100.0,
        breakpoints: &[(275.066, 5.0), (324.661, 6.0), (378.902, 7.0)],
        near: &[(100.0, 2.0, 1.8), (200.0, 3.0, 1.4)],
    }];

    #[test]
    fn test_interpolates_with_damping() {
        let power = side_shot(ROW_100, 150.0, 300.0, DEFAULT_DAMPING).unwrap();
        let expected = 5.0 + 0.8 * (300.0 - 275.066) / (324.661 - 275.066);
        assert!((power.angular_speed - PI * expected).abs() < 1e-4);
        assert!((expected - 5.402).abs() < 1e-3);
        assert_eq!(power.elevation, 1.0);
    }

    #[test]
    fn test_clamps_past_last_breakpoint() {
        let power = side_shot(ROW_100, 100.0, 2000.0, DEFAULT_DAMPING).unwrap();
        assert!((power.angular_speed - PI * 7.0).abs() < 1e-5);
    }

    #[test]
    fn test_near_table_nearest_with_tie_to_earlier() {
        // 150 is equidistant from 100 and 200
        let power = side_shot(ROW_100, 100.0, 150.0, DEFAULT_DAMPING).unwrap();
        assert!((power.angular_speed - PI * 2.0).abs() < 1e-5);
        assert_eq!(power.elevation, 1.8);

        let power = side_shot(ROW_100, 100.0, 190.0, DEFAULT_DAMPING).unwrap();
        assert_eq!(power.elevation, 1.4);
    }

    #[test]
    fn test_row_selection() {
        // Below every bucket falls back to the first row
        let first = side_shot(SHOT_TABLE, -10.0, 300.0, DEFAULT_DAMPING).unwrap();
        let zero = side_shot(SHOT_TABLE, 0.0, 300.0, DEFAULT_DAMPING).unwrap();
        assert_eq!(first, zero);

        // 350 uses the 300 bucket, whose first breakpoint is 360.218
        let power = side_shot(SHOT_TABLE, 350.0, 360.218, DEFAULT_DAMPING).unwrap();
        assert!((power.angular_speed - PI * 7.0).abs() < 1e-4);
    }

    #[test]
    fn test_top_step_lookup() {
        let table = [(432.837, 12.0), (508.317, 15.0), (590.264, 18.0)];
        let speed = top_shot(&table, 450.0).unwrap();
        assert!((speed - PI * 12.0).abs() < 1e-5);
        // Below the first breakpoint clamps to it
        assert!((top_shot(&table, 100.0).unwrap() - PI * 12.0).abs() < 1e-5);
        // Beyond the last breakpoint clamps to it
        assert!((top_shot(&table, 5000.0).unwrap() - PI * 18.0).abs() < 1e-5);
    }

    #[test]
    fn test_tables_are_ascending() {
        for pair in SHOT_TABLE.windows(2) {
            assert!(pair[0].distance < pair[1].distance);
        }
        for row in SHOT_TABLE {
            for pair in row.breakpoints.windows(2) {
                assert!(pair[0].0 < pair[1].0);
            }
            assert!(row.near.iter().all(|n| n.0 < row.breakpoints[0].0));
        }
        for pair in TOP_TABLE.windows(2) {
            assert!(pair[0].0 < pair[1].0);
        }
    }

    #[test]
    fn test_empty_tables() {
        assert!(side_shot(&[], 100.0, 300.0, DEFAULT_DAMPING).is_none());
        assert!(top_shot(&[], 100.0).is_none());
    }
}
