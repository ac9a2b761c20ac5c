use super::vertex::Position;

/// Midpoint of the axis-aligned bounding box; the origin when there are no
/// positions.
pub fn center_all_axes<I>(positions: I) -> Position
where
    I: IntoIterator<Item = Position>,
{
    let bounds = positions
        .into_iter()
        .fold(None, |acc: Option<(Position, Position)>, p| match acc {
            Some((min, max)) => Some((
                Position::new(min.x.min(p.x), min.y.min(p.y), min.z.min(p.z)),
                Position::new(max.x.max(p.x), max.y.max(p.y), max.z.max(p.z)),
            )),
            None => Some((p, p)),
        });

    match bounds {
        Some((min, max)) => Position::new(
            center_from_range(min.x, max.x),
            center_from_range(min.y, max.y),
            center_from_range(min.z, max.z),
        ),
        None => Position::default(),
    }
}

fn center_from_range(min: f32, max: f32) -> f32 {
    (min + max) * 0.5
}

#[cfg(test)]
mod tests {
    use super::center_all_axes;
    use crate::scene::vertex::Position;

    #[test]
    fn center_all_axes_uses_aabb_midpoint() {
        let center = center_all_axes(vec![
            Position::new(-5.0, -3.0, 2.0),
            Position::new(7.0, 1.0, 10.0),
            Position::new(0.0, 4.0, -6.0),
        ]);

        assert_eq!(center, Position::new(1.0, 0.5, 2.0));
    }

    #[test]
    fn center_all_axes_returns_origin_for_empty_input() {
        assert_eq!(center_all_axes(Vec::new()), Position::default());
    }
}
