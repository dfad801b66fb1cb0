use medproc_image::Image;

/// Whether a traced border surrounds a foreground region or a hole.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BorderType {
    /// Perimeter of foreground regions.
    Outer,
    /// Perimeter of background regions enclosed by foreground.
    Hole,
}

/// A 2-dimensional pixel coordinate.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Point {
    /// x-coordinate.
    pub x: i32,
    /// y-coordinate.
    pub y: i32,
}

impl Point {
    /// Construct a point at (x, y).
    pub fn new(x: i32, y: i32) -> Self {
        Point { x, y }
    }
}

/// The border of a region.
#[derive(Debug, Clone)]
pub struct Contour {
    /// The pixels on the border, in tracing order.
    pub points: Vec<Point>,
    /// The type of the border. Outer or Hole.
    pub border_type: BorderType,
    /// Index of the enclosing border, `None` when it is the image frame.
    pub parent: Option<usize>,
}

impl Contour {
    /// Whether the border is an outer border directly enclosed by the image frame.
    pub fn is_external(&self) -> bool {
        self.border_type == BorderType::Outer && self.parent.is_none()
    }
}

// clockwise with y pointing down: E, SE, S, SW, W, NW, N, NE
const DIRECTIONS: [(i32, i32); 8] = [
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
    (0, -1),
    (1, -1),
];

fn direction_index(dx: i32, dy: i32) -> usize {
    DIRECTIONS
        .iter()
        .position(|&d| d == (dx, dy))
        .unwrap_or(0)
}

/// Finds the borders of the foreground regions of a binary image.
///
/// Non zero pixels are foreground, pixels outside the image are background.
/// Borders are found with the Suzuki and Abe border following algorithm and
/// returned in the raster order of their starting pixel, together with the
/// hierarchy of the borders.
///
/// # Arguments
///
/// * `src` - The binary input image.
///
/// # Returns
///
/// All the borders of the image.
pub fn find_contours(src: &Image<u8, 1>) -> Vec<Contour> {
    // labels live in a grid with a one pixel zero frame
    let width = src.cols() + 2;
    let height = src.rows() + 2;
    let mut labels = vec![0i32; width * height];
    for (y, row) in src.as_slice().chunks_exact(src.cols()).enumerate() {
        for (x, &v) in row.iter().enumerate() {
            labels[(y + 1) * width + x + 1] = i32::from(v != 0);
        }
    }

    let at = |x: i32, y: i32| y as usize * width + x as usize;
    let mut contours: Vec<Contour> = Vec::new();
    let mut nbd = 1i32;

    for y in 1..height as i32 - 1 {
        let mut lnbd = 1i32;

        for x in 1..width as i32 - 1 {
            let value = labels[at(x, y)];
            if value == 0 {
                continue;
            }

            let start = if value == 1 && labels[at(x - 1, y)] == 0 {
                Some(((x - 1, y), BorderType::Outer))
            } else if value >= 1 && labels[at(x + 1, y)] == 0 {
                if value > 1 {
                    lnbd = value;
                }
                Some(((x + 1, y), BorderType::Hole))
            } else {
                None
            };

            if let Some((adj, border_type)) = start {
                nbd += 1;

                let parent = if lnbd >= 2 {
                    let index = (lnbd - 2) as usize;
                    let enclosing = &contours[index];
                    if (border_type == BorderType::Outer)
                        ^ (enclosing.border_type == BorderType::Outer)
                    {
                        Some(index)
                    } else {
                        enclosing.parent
                    }
                } else {
                    None
                };

                let points = follow_border(&mut labels, width, (x, y), adj, nbd);
                contours.push(Contour {
                    points,
                    border_type,
                    parent,
                });
            }

            let value = labels[at(x, y)];
            if value != 1 {
                lnbd = value.abs();
            }
        }
    }

    contours
}

/// Trace one border from `start`, `adj` being its background neighbour.
///
/// Returned points are in image coordinates.
fn follow_border(
    labels: &mut [i32],
    width: usize,
    start: (i32, i32),
    adj: (i32, i32),
    nbd: i32,
) -> Vec<Point> {
    let at = |x: i32, y: i32| y as usize * width + x as usize;
    let to_point = |(x, y): (i32, i32)| Point::new(x - 1, y - 1);

    // clockwise search for the first foreground neighbour
    let first_dir = direction_index(adj.0 - start.0, adj.1 - start.1);
    let first = (0..8).map(|k| DIRECTIONS[(first_dir + k) % 8]).find_map(|(dx, dy)| {
        let p = (start.0 + dx, start.1 + dy);
        (labels[at(p.0, p.1)] != 0).then_some(p)
    });

    let Some(first) = first else {
        labels[at(start.0, start.1)] = -nbd;
        return vec![to_point(start)];
    };

    let mut points = Vec::new();
    let mut prev = first;
    let mut curr = start;

    loop {
        points.push(to_point(curr));

        // counter clockwise search starting next to the previous pixel
        let prev_dir = direction_index(prev.0 - curr.0, prev.1 - curr.1);
        let mut east_examined = false;
        let mut next = prev;
        for k in 1..=8 {
            let d = (prev_dir + 8 - k) % 8;
            let (dx, dy) = DIRECTIONS[d];
            let p = (curr.0 + dx, curr.1 + dy);
            if labels[at(p.0, p.1)] != 0 {
                next = p;
                break;
            }
            if d == 0 {
                east_examined = true;
            }
        }

        let idx = at(curr.0, curr.1);
        if east_examined {
            labels[idx] = -nbd;
        } else if labels[idx] == 1 {
            labels[idx] = nbd;
        }

        if next == start && curr == first {
            break;
        }
        prev = curr;
        curr = next;
    }

    points
}

/// Length of the closed polygon through the contour points.
///
/// Axial steps count 1 and diagonal steps count √2. A single point has length 0.
pub fn arc_length(points: &[Point]) -> f64 {
    if points.len() < 2 {
        return 0.0;
    }

    let step = |a: &Point, b: &Point| {
        let dx = (a.x - b.x) as f64;
        let dy = (a.y - b.y) as f64;
        (dx * dx + dy * dy).sqrt()
    };

    let open: f64 = points.windows(2).map(|w| step(&w[0], &w[1])).sum();
    match (points.first(), points.last()) {
        (Some(first), Some(last)) => open + step(last, first),
        _ => open,
    }
}
