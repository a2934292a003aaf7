use crate::config::CounterConfig;
use crate::types::{BBox, Point};

/// Extracts anchor points from detection boxes, one per surviving box.
///
/// Boxes that stick out of the frame or fall under the minimum size are
/// dropped. Oversized boxes are clipped toward their origin before the center
/// is taken, so a detector's occasional stretched box doesn't skew the anchor
/// point far from the true object center.
pub fn anchor_points<'a>(
    boxes: &'a [BBox],
    frame_width: i32,
    frame_height: i32,
    config: &'a CounterConfig,
) -> impl Iterator<Item = Point> + 'a {
    boxes.iter().filter_map(move |b| {
        if !b.contained_in(frame_width, frame_height) {
            return None;
        }

        let mut width = b.width();
        let mut height = b.height();
        if width < config.min_width || height < config.min_height {
            return None;
        }

        // Clip oversized boxes; if the clipped size would stretch past the
        // frame edge, clip to the remaining frame space instead.
        if width > config.clip_width {
            width = if b.left + config.clip_width < frame_width {
                config.clip_width
            } else {
                frame_width - b.left
            };
        }
        if height > config.clip_height {
            height = if b.top + config.clip_height < frame_height {
                config.clip_height
            } else {
                frame_height - b.top
            };
        }

        Some(Point::new(b.left + width / 2, b.top + height / 2))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bbox(left: i32, top: i32, right: i32, bottom: i32) -> BBox {
        BBox {
            left,
            top,
            right,
            bottom,
            confidence: 0.9,
        }
    }

    fn extract(boxes: &[BBox], width: i32, height: i32) -> Vec<Point> {
        let config = CounterConfig::default();
        anchor_points(boxes, width, height, &config).collect()
    }

    #[test]
    fn test_emits_box_center() {
        let points = extract(&[bbox(100, 100, 200, 200)], 1280, 720);
        assert_eq!(points, vec![Point::new(150, 150)]);
    }

    #[test]
    fn test_discards_box_outside_frame() {
        // sticks out on the right
        assert!(extract(&[bbox(1200, 100, 1300, 200)], 1280, 720).is_empty());
        // negative origin
        assert!(extract(&[bbox(-10, 100, 90, 200)], 1280, 720).is_empty());
    }

    #[test]
    fn test_discards_tiny_box() {
        // 79 wide, under the 80px minimum
        assert!(extract(&[bbox(100, 100, 179, 200)], 1280, 720).is_empty());
        // 49 tall, under the 50px minimum
        assert!(extract(&[bbox(100, 100, 250, 149)], 1280, 720).is_empty());
    }

    #[test]
    fn test_clips_oversized_box() {
        // 400 wide, clipped to the 200px ceiling before taking the center
        let points = extract(&[bbox(100, 100, 500, 200)], 1280, 720);
        assert_eq!(points, vec![Point::new(200, 150)]);

        // 500 tall, clipped to the 350px ceiling
        let points = extract(&[bbox(100, 100, 250, 600)], 1280, 720);
        assert_eq!(points, vec![Point::new(175, 275)]);
    }

    #[test]
    fn test_keeps_normal_boxes_among_rejects() {
        let boxes = [
            bbox(100, 100, 200, 200),
            bbox(-5, 0, 95, 100),
            bbox(300, 300, 340, 330),
        ];
        let points = extract(&boxes, 1280, 720);
        assert_eq!(points, vec![Point::new(150, 150)]);
    }
}
