//! Candidate filtering and ordering.

use cardscan_core::Quadrilateral;

/// Keep quadrilaterals whose area lies within `±percent_tolerance` % of the
/// mean area of all inputs. Input order is preserved.
///
/// Cards in one photo share a physical size and roughly the same camera
/// distance, so they cluster around the mean while binarization artifacts
/// fall outside the band.
pub fn filter_by_area(quads: &[Quadrilateral], percent_tolerance: f64) -> Vec<Quadrilateral> {
    if quads.is_empty() {
        return Vec::new();
    }
    let areas: Vec<f64> = quads.iter().map(Quadrilateral::area).collect();
    let mean = areas.iter().sum::<f64>() / areas.len() as f64;
    let band = percent_tolerance / 100.0;
    let (lo, hi) = (mean * (1.0 - band), mean * (1.0 + band));

    quads
        .iter()
        .zip(&areas)
        .filter(|&(_, &a)| a >= lo && a <= hi)
        .map(|(q, _)| *q)
        .collect()
}

fn median(mut values: Vec<f32>) -> f32 {
    if values.is_empty() {
        return 0.0;
    }
    values.sort_by(f32::total_cmp);
    let n = values.len();
    if n % 2 == 1 {
        values[n / 2]
    } else {
        0.5 * (values[n / 2 - 1] + values[n / 2])
    }
}

/// Cluster quadrilaterals into rows, top to bottom, each row left to right.
///
/// A quadrilateral joins the current row when its centroid is no more than
/// half the median quadrilateral height below the row's mean centroid `y`;
/// otherwise it starts a new row. All sorts are stable, so ties keep their
/// input order.
pub fn group_rows(quads: &[Quadrilateral]) -> Vec<Vec<Quadrilateral>> {
    let centroids: Vec<_> = quads.iter().map(Quadrilateral::centroid).collect();
    let threshold = 0.5 * median(quads.iter().map(Quadrilateral::height).collect());

    let mut order: Vec<usize> = (0..quads.len()).collect();
    order.sort_by(|&a, &b| centroids[a].y.total_cmp(&centroids[b].y));

    let mut rows: Vec<Vec<usize>> = Vec::new();
    let mut row_sum_y = 0.0_f32;
    for idx in order {
        let y = centroids[idx].y;
        match rows.last_mut() {
            Some(row) if y - row_sum_y / row.len() as f32 <= threshold => {
                row.push(idx);
                row_sum_y += y;
            }
            _ => {
                rows.push(vec![idx]);
                row_sum_y = y;
            }
        }
    }

    rows.into_iter()
        .map(|mut row| {
            row.sort_by(|&a, &b| centroids[a].x.total_cmp(&centroids[b].x));
            row.into_iter().map(|i| quads[i]).collect()
        })
        .collect()
}

/// Row-major ordering: rows from [`group_rows`], concatenated.
pub fn sort_row_wise(quads: &[Quadrilateral]) -> Vec<Quadrilateral> {
    group_rows(quads).into_iter().flatten().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point2;

    fn rect(x: f32, y: f32, w: f32, h: f32) -> Quadrilateral {
        Quadrilateral::new([
            Point2::new(x, y),
            Point2::new(x + w, y),
            Point2::new(x + w, y + h),
            Point2::new(x, y + h),
        ])
    }

    #[test]
    fn area_filter_drops_single_outlier() {
        let mut quads: Vec<_> = (0..8).map(|i| rect(i as f32 * 20.0, 0.0, 10.0, 10.0)).collect();
        quads.insert(3, rect(300.0, 300.0, 2.0, 5.0));

        let kept = filter_by_area(&quads, 20.0);
        assert_eq!(kept.len(), 8);
        assert!(kept.iter().all(|q| (q.area() - 100.0).abs() < 1e-6));
    }

    #[test]
    fn area_filter_drops_oversized_outlier() {
        let mut quads: Vec<_> = (0..8).map(|i| rect(i as f32 * 20.0, 0.0, 10.0, 10.0)).collect();
        quads.push(rect(0.0, 50.0, 10.0, 15.0));

        let kept = filter_by_area(&quads, 20.0);
        assert_eq!(kept, quads[..8].to_vec());
    }

    #[test]
    fn area_band_is_symmetric() {
        // mean = 100
        let quads = vec![rect(0.0, 0.0, 8.0, 10.0), rect(0.0, 0.0, 12.0, 10.0)];
        assert_eq!(filter_by_area(&quads, 21.0).len(), 2);
        assert_eq!(filter_by_area(&quads, 19.0).len(), 0);
        assert!(filter_by_area(&[], 20.0).is_empty());
    }

    #[test]
    fn grid_is_sorted_row_major() {
        // 3x3 grid with jitter, shuffled input
        let mut grid = Vec::new();
        for r in 0..3 {
            for c in 0..3 {
                let jitter = ((r * 3 + c) % 4) as f32 * 3.0 - 4.0;
                grid.push(((r, c), rect(c as f32 * 80.0 + jitter, r as f32 * 120.0 - jitter, 60.0, 90.0)));
            }
        }
        let shuffled: Vec<_> = [7, 2, 5, 0, 8, 3, 1, 6, 4].iter().map(|&i| grid[i].1).collect();
        let sorted = sort_row_wise(&shuffled);

        let expected: Vec<_> = grid.iter().map(|(_, q)| *q).collect();
        assert_eq!(sorted, expected);
        assert_eq!(group_rows(&shuffled).iter().map(Vec::len).collect::<Vec<_>>(), vec![3, 3, 3]);
    }

    #[test]
    fn sorting_is_deterministic_under_ties() {
        let a = rect(0.0, 0.0, 10.0, 10.0);
        let b = rect(0.0, 0.0, 10.0, 10.0);
        let c = rect(20.0, 1.0, 10.0, 10.0);
        let first = sort_row_wise(&[a, c, b]);
        let second = sort_row_wise(&[a, c, b]);
        assert_eq!(first, second);
        assert_eq!(first, vec![a, b, c]);
    }

    #[test]
    fn tall_and_short_rows_separate() {
        let top = rect(100.0, 0.0, 60.0, 90.0);
        let bottom_left = rect(0.0, 100.0, 60.0, 90.0);
        assert_eq!(sort_row_wise(&[bottom_left, top]), vec![top, bottom_left]);
        assert!(sort_row_wise(&[]).is_empty());
    }
}
