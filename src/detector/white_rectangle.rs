//! White rectangle detection
//!
//! Detects a candidate barcode-like rectangular region within an image.
//! Starting around a centre point, the candidate region grows until every
//! side is white, then the last black points encountered on the four
//! diagonals become the corners of the symbol.
//!
//! Rust port based on Java code from the ZXing library.
//! Original Java code copyright (C) 2010 ZXing authors.
//! Licensed under Apache License 2.0

use crate::matrix::BitMatrix;
use crate::point::{distance, round, ResultPoint};
use crate::{Error, Result};

const INIT_SIZE: i32 = 10;
const CORR: i32 = 1;
/// Percentage of a side length tolerated as stray black before the side
/// counts as non-white, in try-harder mode
const TOLERANCE: i32 = 2;

/// Expanding-rectangle detector over a binary image.
pub struct WhiteRectangleDetector<'a> {
    image: &'a BitMatrix,
    width: i32,
    height: i32,
    left_init: i32,
    right_init: i32,
    up_init: i32,
    down_init: i32,
    try_harder: bool,
}

impl<'a> WhiteRectangleDetector<'a> {
    /// Create a detector searching from the image centre with the default
    /// initial size.
    ///
    /// Fails with [`Error::NotFound`] if the image is too small to hold
    /// the initial search area.
    pub fn new(image: &'a BitMatrix) -> Result<Self> {
        let x = image.width() as i32 / 2;
        let y = image.height() as i32 / 2;
        Self::with_region(image, INIT_SIZE, x, y, false)
    }

    /// Like [`WhiteRectangleDetector::new`], in try-harder mode: border
    /// scans tolerate a small fraction of stray black pixels and corner
    /// refinement cross-checks candidates.
    pub fn new_try_harder(image: &'a BitMatrix) -> Result<Self> {
        let x = image.width() as i32 / 2;
        let y = image.height() as i32 / 2;
        Self::with_region(image, INIT_SIZE, x, y, true)
    }

    /// Create a detector with an explicit initial size and search centre.
    pub fn with_region(
        image: &'a BitMatrix,
        init_size: i32,
        x: i32,
        y: i32,
        try_harder: bool,
    ) -> Result<Self> {
        let width = image.width() as i32;
        let height = image.height() as i32;
        let half_size = init_size / 2;
        let left_init = x - half_size;
        let right_init = x + half_size;
        let up_init = y - half_size;
        let down_init = y + half_size;
        if up_init < 0 || left_init < 0 || down_init >= height || right_init >= width {
            return Err(Error::NotFound);
        }
        Ok(Self {
            image,
            width,
            height,
            left_init,
            right_init,
            up_init,
            down_init,
            try_harder,
        })
    }

    /// Detect a white-bordered rectangular region.
    ///
    /// Returns four corner points: the first and last are opposed on the
    /// diagonal, as are the second and third. The first point is the
    /// topmost, the last the bottommost; the second is the leftmost and
    /// the third the rightmost.
    pub fn detect(&self) -> Result<[ResultPoint; 4]> {
        let mut left = self.left_init;
        let mut right = self.right_init;
        let mut up = self.up_init;
        let mut down = self.down_init;
        let mut size_exceeded = false;
        let mut a_black_point_found_on_border = true;
        let mut at_least_one_black_point_found_on_border = false;

        let mut black_seen_on_right = false;
        let mut black_seen_on_bottom = false;
        let mut black_seen_on_left = false;
        let mut black_seen_on_top = false;

        while a_black_point_found_on_border {
            a_black_point_found_on_border = false;

            // push the right border outward
            let mut right_border_not_white = true;
            while (right_border_not_white || !black_seen_on_right) && right < self.width {
                right_border_not_white = self.contains_black_point(up, down, right, false);
                if right_border_not_white {
                    right += 1;
                    a_black_point_found_on_border = true;
                    black_seen_on_right = true;
                } else if !black_seen_on_right {
                    right += 1;
                }
            }

            if right >= self.width {
                size_exceeded = true;
                break;
            }

            // push the bottom border outward
            let mut bottom_border_not_white = true;
            while (bottom_border_not_white || !black_seen_on_bottom) && down < self.height {
                bottom_border_not_white = self.contains_black_point(left, right, down, true);
                if bottom_border_not_white {
                    down += 1;
                    a_black_point_found_on_border = true;
                    black_seen_on_bottom = true;
                } else if !black_seen_on_bottom {
                    down += 1;
                }
            }

            if down >= self.height {
                size_exceeded = true;
                break;
            }

            // push the left border outward
            let mut left_border_not_white = true;
            while (left_border_not_white || !black_seen_on_left) && left >= 0 {
                left_border_not_white = self.contains_black_point(up, down, left, false);
                if left_border_not_white {
                    left -= 1;
                    a_black_point_found_on_border = true;
                    black_seen_on_left = true;
                } else if !black_seen_on_left {
                    left -= 1;
                }
            }

            if left < 0 {
                size_exceeded = true;
                break;
            }

            // push the top border outward
            let mut top_border_not_white = true;
            while (top_border_not_white || !black_seen_on_top) && up >= 0 {
                top_border_not_white = self.contains_black_point(left, right, up, true);
                if top_border_not_white {
                    up -= 1;
                    a_black_point_found_on_border = true;
                    black_seen_on_top = true;
                } else if !black_seen_on_top {
                    up -= 1;
                }
            }

            if up < 0 {
                size_exceeded = true;
                break;
            }

            if a_black_point_found_on_border {
                at_least_one_black_point_found_on_border = true;
            }
        }

        if size_exceeded || !at_least_one_black_point_found_on_border {
            return Err(Error::NotFound);
        }

        let (left, right, up, down) = (left as f32, right as f32, up as f32, down as f32);

        // refine one corner per diagonal of the final white rectangle
        let z = self.find_edge_point(ResultPoint::new(left, down), ResultPoint::new(right, up))?;
        let t = self.find_edge_point(ResultPoint::new(left, up), ResultPoint::new(right, down))?;
        let x = self.find_edge_point(ResultPoint::new(right, up), ResultPoint::new(left, down))?;
        let y = self.find_edge_point(ResultPoint::new(right, down), ResultPoint::new(left, up))?;

        match (z, t, x, y) {
            (Some(z), Some(t), Some(x), Some(y)) => Ok(self.center_edges(y, z, x, t)),
            _ => Err(Error::NotFound),
        }
    }

    fn get(&self, x: i32, y: i32) -> bool {
        self.image.get(x as usize, y as usize)
    }

    /// Return the edge point of the symbol closest to the given corner of
    /// the surrounding white rectangle.
    ///
    /// Walks parallel diagonal cuts inward from `edge` toward `opp_edge`,
    /// with a linear step on one axis and a double step on the other.
    fn find_edge_point(
        &self,
        edge: ResultPoint,
        opp_edge: ResultPoint,
    ) -> Result<Option<ResultPoint>> {
        let max_size = (edge.x - opp_edge.x).abs() as i32;
        let vertical_max_size = (edge.y - opp_edge.y).abs() as i32;

        let mut a: Option<ResultPoint> = None;
        let mut a1: Option<ResultPoint> = None;
        let mut a2: Option<ResultPoint> = None;
        let mut borders_checked = false;

        let mut i = 1;
        let mut j = 2;
        while j < max_size / 2 && j < vertical_max_size / 2 {
            // in try-harder mode a black point may survive on a border
            // because of the scan tolerance; such a point must be checked
            // first, and only counts if it looks like a genuine corner
            if self.try_harder && !borders_checked {
                a1 = self.get_black_point_on_segment(
                    edge.x,
                    edge.y,
                    if edge.x < opp_edge.x {
                        edge.x + (max_size / 2) as f32
                    } else {
                        edge.x - (max_size / 2) as f32
                    },
                    edge.y,
                );
                a2 = self.get_black_point_on_segment(
                    edge.x,
                    edge.y,
                    edge.x,
                    if edge.y > opp_edge.y {
                        edge.y - (vertical_max_size / 2) as f32
                    } else {
                        edge.y + (vertical_max_size / 2) as f32
                    },
                );
                a1 = match a1 {
                    Some(p) if self.is_corner_point(p, edge, max_size, vertical_max_size)? => {
                        Some(p)
                    }
                    _ => None,
                };
                a2 = match a2 {
                    Some(p) if self.is_corner_point(p, edge, vertical_max_size, max_size)? => {
                        Some(p)
                    }
                    _ => None,
                };
                borders_checked = true;
            }

            if a.is_none() {
                a = self.get_black_point_on_segment(
                    edge.x,
                    if edge.y > opp_edge.y {
                        edge.y - i as f32
                    } else {
                        edge.y + i as f32
                    },
                    if edge.x < opp_edge.x {
                        edge.x + i as f32
                    } else {
                        edge.x - i as f32
                    },
                    edge.y,
                );
            }
            if a1.is_none() {
                a1 = self.get_black_point_on_segment(
                    if edge.x < opp_edge.x {
                        edge.x + j as f32
                    } else {
                        edge.x - j as f32
                    },
                    edge.y,
                    edge.x,
                    if edge.y > opp_edge.y {
                        edge.y - i as f32
                    } else {
                        edge.y + i as f32
                    },
                );
            }
            if a2.is_none() {
                a2 = self.get_black_point_on_segment(
                    edge.x,
                    if edge.y > opp_edge.y {
                        edge.y - j as f32
                    } else {
                        edge.y + j as f32
                    },
                    if edge.x < opp_edge.x {
                        edge.x + i as f32
                    } else {
                        edge.x - i as f32
                    },
                    edge.y,
                );
            }

            if !self.try_harder && a.is_some() {
                break;
            }
            if self.try_harder {
                if let (Some(p1), Some(p2)) = (a1, a2) {
                    a = Some(if !self.in_black_module(p1, p2) {
                        // not in a black module: take the middle, then
                        // push it back outside the symbol
                        let mid =
                            ResultPoint::new((p1.x + p2.x) / 2.0, (p1.y + p2.y) / 2.0);
                        self.decentralize_point(mid, edge, opp_edge)
                    } else if self.in_border_line(p1, edge, opp_edge) {
                        p1
                    } else if self.in_border_line(p2, edge, opp_edge) {
                        p2
                    } else {
                        // neither candidate sits on a border line: pull a
                        // reconstructed point toward the outer corner
                        ResultPoint::new(
                            if edge.x < opp_edge.x {
                                p1.x.min(p2.x)
                            } else {
                                p1.x.max(p2.x)
                            },
                            if edge.y > opp_edge.y {
                                p1.y.max(p2.y)
                            } else {
                                p1.y.min(p2.y)
                            },
                        )
                    });
                    break;
                }
            }

            i += 1;
            j += 2;
        }
        Ok(a)
    }

    /// True if a point lies on one of the four border lines of the
    /// rectangle spanned by `edge` and `opp_edge`
    fn in_border_line(&self, a: ResultPoint, edge: ResultPoint, opp_edge: ResultPoint) -> bool {
        a.x == edge.x || a.x == opp_edge.x || a.y == edge.y || a.y == opp_edge.y
    }

    /// Shift a black point outward, away from `opp_edge`, until it leaves
    /// the black module, then two pixels further so the final centering
    /// correction lands it cleanly outside
    fn decentralize_point(
        &self,
        a: ResultPoint,
        edge: ResultPoint,
        opp_edge: ResultPoint,
    ) -> ResultPoint {
        let corr = CORR as f32;
        let mut a = a;
        while self.get(a.x as i32, a.y as i32) {
            a = ResultPoint::new(
                if edge.x > opp_edge.x { a.x + corr } else { a.x - corr },
                if edge.y > opp_edge.y { a.y + corr } else { a.y - corr },
            );
        }
        ResultPoint::new(
            if edge.x > opp_edge.x {
                a.x + corr + 1.0
            } else {
                a.x - corr - 1.0
            },
            if edge.y > opp_edge.y {
                a.y + corr + 1.0
            } else {
                a.y - corr - 1.0
            },
        )
    }

    /// Heuristic test that a border black point is a genuine symbol
    /// corner rather than scan noise.
    ///
    /// `a` and `b` must share an axis; anything else is a contract bug
    /// and surfaces as [`Error::Internal`]. Short probes near the corner
    /// must stay under 10% black, long probes along the whole opposite
    /// side under 15%.
    fn is_corner_point(
        &self,
        a: ResultPoint,
        b: ResultPoint,
        points_side_max_size: i32,
        points_vertical_side_max_size: i32,
    ) -> Result<bool> {
        let width = self.width as f32;
        let height = self.height as f32;

        if a.x == b.x {
            // candidates share the Y axis; probe horizontally for 5% of
            // the short side
            let mut i = 1;
            while i < points_vertical_side_max_size * 5 / 100 {
                let bx_fwd = if b.x + (i as f32) < width { b.x + i as f32 } else { width - 1.0 };
                let bx_back = if b.x - i as f32 > 0.0 { b.x - i as f32 } else { 0.0 };

                let dist1 = round(distance(a.x, a.y, bx_fwd, b.y));
                let dist2 = round(distance(a.x, a.y, bx_back, b.y));
                let black1 = self.count_black_points_on_segment(a.x, a.y, bx_fwd, b.y);
                let black2 = self.count_black_points_on_segment(a.x, a.y, bx_back, b.y);

                if black1 as f32 / dist1 as f32 > 0.1 || black2 as f32 / dist2 as f32 > 0.1 {
                    return Ok(false);
                }
                i += 1;
            }

            // then along 100% of the long side, keeping the final
            // horizontal offset of the loop above
            let mut j = 1;
            while j < points_side_max_size {
                let bx = if (width - a.x).abs() < a.x {
                    if b.x + (i as f32) < width { b.x + i as f32 } else { width - 1.0 }
                } else if b.x - i as f32 > 0.0 {
                    b.x - i as f32
                } else {
                    0.0
                };
                let by = if (height - b.y).abs() < b.y { b.y - j as f32 } else { b.y + j as f32 };

                let dist1 = round(distance(a.x, a.y, bx, by));
                let black1 = self.count_black_points_on_segment(a.x, a.y, bx, by);
                if black1 as f32 / dist1 as f32 > 0.15 {
                    return Ok(false);
                }
                j += 1;
            }
        } else if a.y == b.y {
            // candidates share the X axis; probe vertically for 5% of the
            // short side
            let mut i = 1;
            while i < points_vertical_side_max_size * 5 / 100 {
                let by_fwd = if b.y + (i as f32) < height { b.y + i as f32 } else { height - 1.0 };
                let by_back = if b.y - i as f32 > 0.0 { b.y - i as f32 } else { 0.0 };

                let dist1 = round(distance(a.x, a.y, b.x, by_fwd));
                let dist2 = round(distance(a.x, a.y, b.x, by_back));
                let black1 = self.count_black_points_on_segment(a.x, a.y, b.x, by_fwd);
                let black2 = self.count_black_points_on_segment(a.x, a.y, b.x, by_back);

                if black1 as f32 / dist1 as f32 > 0.1 || black2 as f32 / dist2 as f32 > 0.1 {
                    return Ok(false);
                }
                i += 1;
            }

            let mut j = 1;
            while j < points_side_max_size {
                let bx = if (width - b.x).abs() < b.x { b.x - j as f32 } else { b.x + j as f32 };
                let by = if (height - a.y).abs() < a.y {
                    if b.y + (i as f32) < height { b.y + i as f32 } else { height - 1.0 }
                } else if b.y - i as f32 > 0.0 {
                    b.y - i as f32
                } else {
                    0.0
                };

                let dist1 = round(distance(a.x, a.y, bx, by));
                let black1 = self.count_black_points_on_segment(a.x, a.y, bx, by);
                if black1 as f32 / dist1 as f32 > 0.15 {
                    return Ok(false);
                }
                j += 1;
            }
        } else {
            return Err(Error::Internal("corner probe points must share an axis"));
        }

        Ok(true)
    }

    /// True if over 90% of the samples on the segment are black; for a
    /// zero-length segment, whether the single pixel is black
    fn in_black_module(&self, a1: ResultPoint, a2: ResultPoint) -> bool {
        let dist = round(distance(a1.x, a1.y, a2.x, a2.y));
        if dist == 0 {
            return self.get(a1.x as i32, a1.y as i32);
        }
        let black_points = self.count_black_points_on_segment(a1.x, a1.y, a2.x, a2.y);
        black_points as f32 / dist as f32 > 0.9
    }

    /// First black sample on the segment from (ax, ay) to (bx, by)
    fn get_black_point_on_segment(
        &self,
        ax: f32,
        ay: f32,
        bx: f32,
        by: f32,
    ) -> Option<ResultPoint> {
        let dist = round(distance(ax, ay, bx, by));
        let x_step = (bx - ax) / dist as f32;
        let y_step = (by - ay) / dist as f32;

        for i in 0..dist {
            let x = round(ax + i as f32 * x_step);
            let y = round(ay + i as f32 * y_step);
            if self.get(x, y) {
                return Some(ResultPoint::new(x as f32, y as f32));
            }
        }
        None
    }

    /// Number of black samples on the segment from (ax, ay) to (bx, by),
    /// endpoints included
    fn count_black_points_on_segment(&self, ax: f32, ay: f32, bx: f32, by: f32) -> i32 {
        let dist = round(distance(ax, ay, bx, by));
        let x_step = (bx - ax) / dist as f32;
        let y_step = (by - ay) / dist as f32;

        let mut counter = 0;
        for i in 0..=dist {
            let x = round(ax + i as f32 * x_step);
            let y = round(ay + i as f32 * y_step);
            if self.get(x, y) {
                counter += 1;
            }
        }
        counter
    }

    /// Recenter the four refined points a constant distance toward the
    /// image centre and order them topmost, leftmost, rightmost,
    /// bottommost
    fn center_edges(
        &self,
        y: ResultPoint,
        z: ResultPoint,
        x: ResultPoint,
        t: ResultPoint,
    ) -> [ResultPoint; 4] {
        let corr = CORR as f32;
        if y.x < self.width as f32 / 2.0 {
            [
                ResultPoint::new(t.x - corr, t.y + corr),
                ResultPoint::new(z.x + corr, z.y + corr),
                ResultPoint::new(x.x - corr, x.y - corr),
                ResultPoint::new(y.x + corr, y.y - corr),
            ]
        } else {
            [
                ResultPoint::new(t.x + corr, t.y + corr),
                ResultPoint::new(z.x + corr, z.y - corr),
                ResultPoint::new(x.x - corr, x.y + corr),
                ResultPoint::new(y.x - corr, y.y - corr),
            ]
        }
    }

    /// True if the border scan line finds black, subject to the stray
    /// pixel tolerance in try-harder mode.
    ///
    /// `a..=b` is the scanned range on the moving axis, `fixed` the
    /// coordinate on the other axis.
    fn contains_black_point(&self, a: i32, b: i32, fixed: i32, horizontal: bool) -> bool {
        let tolerance_pixels = round((a - b).abs() as f32 * TOLERANCE as f32 / 100.0);
        let mut black_bits = 0;
        if horizontal {
            for x in a..=b {
                if self.get(x, fixed) {
                    black_bits += 1;
                    if !self.try_harder || black_bits > tolerance_pixels {
                        return true;
                    }
                }
            }
        } else {
            for y in a..=b {
                if self.get(fixed, y) {
                    black_bits += 1;
                    if !self.try_harder || black_bits > tolerance_pixels {
                        return true;
                    }
                }
            }
        }
        false
    }
}
