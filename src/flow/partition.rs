//! Column-strip decomposition for the parallel relaxation.
use crate::error::{FlowError, Result};
use serde::Serialize;

/// Half-open region `[start_x, end_x) × [start_y, end_y)` owned by one worker.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Strip {
    pub start_x: usize,
    pub end_x: usize,
    pub start_y: usize,
    pub end_y: usize,
}

impl Strip {
    pub fn width(&self) -> usize {
        self.end_x - self.start_x
    }

    pub fn height(&self) -> usize {
        self.end_y - self.start_y
    }

    /// Columns of this strip that the relaxation may update in a `w`-wide
    /// image (the outer frame is excluded).
    pub fn update_columns(&self, w: usize) -> std::ops::Range<usize> {
        let lo = self.start_x.max(1);
        let hi = self.end_x.min(w.saturating_sub(1));
        lo..hi.max(lo)
    }

    /// Rows of this strip that the relaxation may update in an `h`-tall image.
    pub fn update_rows(&self, h: usize) -> std::ops::Range<usize> {
        let lo = self.start_y.max(1);
        let hi = self.end_y.min(h.saturating_sub(1));
        lo..hi.max(lo)
    }
}

/// Split `[0, width)` into `workers` full-height strips with floor-division
/// boundaries `i*W/N .. (i+1)*W/N`.
///
/// Requires `1 <= workers <= width` and `height >= 1`, which guarantees every
/// strip is at least one column wide.
pub fn partition_columns(width: usize, height: usize, workers: usize) -> Result<Vec<Strip>> {
    if workers == 0 || workers > width || height == 0 {
        return Err(FlowError::Partition {
            width,
            height,
            workers,
        });
    }
    Ok((0..workers)
        .map(|i| Strip {
            start_x: i * width / workers,
            end_x: (i + 1) * width / workers,
            start_y: 0,
            end_y: height,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_cover_every_column_exactly_once() {
        for width in 1..40 {
            for workers in 1..=width {
                let strips = partition_columns(width, 3, workers).unwrap();
                assert_eq!(strips.len(), workers);
                let mut hits = vec![0usize; width];
                for s in &strips {
                    assert!(s.width() >= 1, "empty strip for W={width} N={workers}");
                    assert_eq!((s.start_y, s.end_y), (0, 3));
                    for x in s.start_x..s.end_x {
                        hits[x] += 1;
                    }
                }
                assert!(
                    hits.iter().all(|&h| h == 1),
                    "W={width} N={workers} hits={hits:?}"
                );
            }
        }
    }

    #[test]
    fn boundaries_follow_floor_division() {
        let strips = partition_columns(10, 4, 3).unwrap();
        let bounds: Vec<_> = strips.iter().map(|s| (s.start_x, s.end_x)).collect();
        assert_eq!(bounds, vec![(0, 3), (3, 6), (6, 10)]);
    }

    #[test]
    fn invalid_worker_counts_are_rejected() {
        assert!(partition_columns(8, 8, 0).is_err());
        assert!(partition_columns(8, 8, 9).is_err());
        assert!(partition_columns(8, 0, 2).is_err());
    }

    #[test]
    fn update_region_excludes_outer_frame() {
        let strips = partition_columns(6, 5, 2).unwrap();
        assert_eq!(strips[0].update_columns(6), 1..3);
        assert_eq!(strips[1].update_columns(6), 3..5);
        assert_eq!(strips[0].update_rows(5), 1..4);
        let edge = Strip {
            start_x: 5,
            end_x: 6,
            start_y: 0,
            end_y: 5,
        };
        assert!(edge.update_columns(6).is_empty());
    }
}
