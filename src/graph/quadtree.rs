//! Barnes-Hut quadtree for approximate repulsion.
//!
//! Distant groups of nodes are treated as a single charge at their centre,
//! turning the O(n²) pairwise pass into O(n log n). Every node carries unit
//! charge so that, with `theta = 0`, the result matches the exact pass.

use egui::{Pos2, Rect, Vec2};

/// Below this squared distance two bodies are considered coincident
const COINCIDENT_SQ: f32 = 1e-12;

/// Subdivision stops here; deeper bodies share a bucket
const MAX_DEPTH: u32 = 32;

#[derive(Debug, Default)]
enum Cell {
    #[default]
    Empty,
    Leaf {
        index: usize,
        pos: Pos2,
    },
    /// Bodies that could not be separated by subdivision
    Bucket {
        members: Vec<(usize, Pos2)>,
    },
    Branch {
        center_of_mass: Pos2,
        count: u32,
        /// NW, NE, SW, SE
        children: Box<[Cell; 4]>,
    },
}

impl Cell {
    fn count(&self) -> u32 {
        match self {
            Cell::Empty => 0,
            Cell::Leaf { .. } => 1,
            Cell::Bucket { members } => members.len() as u32,
            Cell::Branch { count, .. } => *count,
        }
    }
}

/// 0 = NW, 1 = NE, 2 = SW, 3 = SE
fn quadrant(bounds: Rect, pos: Pos2) -> usize {
    let center = bounds.center();
    let east = pos.x >= center.x;
    let south = pos.y >= center.y;
    (south as usize) * 2 + east as usize
}

fn child_bounds(bounds: Rect, quadrant: usize) -> Rect {
    let c = bounds.center();
    let (min, max) = (bounds.min, bounds.max);
    match quadrant {
        0 => Rect::from_min_max(min, c),
        1 => Rect::from_min_max(Pos2::new(c.x, min.y), Pos2::new(max.x, c.y)),
        2 => Rect::from_min_max(Pos2::new(min.x, c.y), Pos2::new(c.x, max.y)),
        _ => Rect::from_min_max(c, max),
    }
}

/// Inverse-square push on body `i` at `pi` away from body `j` at `pj`.
///
/// Coincident bodies separate along the x axis, lower index toward -x.
pub(crate) fn pair_repulsion(
    i: usize,
    pi: Pos2,
    j: usize,
    pj: Pos2,
    strength: f32,
    min_distance: f32,
) -> Vec2 {
    let delta = pi - pj;
    let len_sq = delta.length_sq();
    let (dir, len) = if len_sq > COINCIDENT_SQ {
        let len = len_sq.sqrt();
        (delta / len, len)
    } else if i < j {
        (Vec2::new(-1.0, 0.0), 0.0)
    } else {
        (Vec2::new(1.0, 0.0), 0.0)
    };
    let distance = len.max(min_distance);
    dir * (strength / (distance * distance))
}

pub struct Quadtree {
    root: Cell,
    bounds: Rect,
    theta: f32,
}

impl Quadtree {
    /// Build a tree over `positions`; body indices are positions in the slice.
    pub fn build(positions: &[Pos2], theta: f32) -> Self {
        if positions.is_empty() {
            return Self {
                root: Cell::Empty,
                bounds: Rect::from_min_max(Pos2::ZERO, Pos2::ZERO),
                theta,
            };
        }

        let mut bounds = Rect::from_min_max(positions[0], positions[0]);
        for &pos in &positions[1..] {
            bounds.extend_with(pos);
        }

        // Square cells keep the opening criterion isotropic
        let side = bounds.width().max(bounds.height()) + 2.0;
        let min = bounds.min - Vec2::splat(1.0);
        let bounds = Rect::from_min_max(min, min + Vec2::splat(side));

        let mut tree = Self {
            root: Cell::Empty,
            bounds,
            theta,
        };
        for (index, &pos) in positions.iter().enumerate() {
            let root = std::mem::take(&mut tree.root);
            tree.root = Self::insert(root, index, pos, bounds, 0);
        }
        tree
    }

    pub fn len(&self) -> usize {
        self.root.count() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn insert(cell: Cell, index: usize, pos: Pos2, bounds: Rect, depth: u32) -> Cell {
        match cell {
            Cell::Empty => Cell::Leaf { index, pos },

            Cell::Leaf {
                index: other,
                pos: other_pos,
            } => {
                if depth >= MAX_DEPTH || (pos - other_pos).length_sq() <= COINCIDENT_SQ {
                    return Cell::Bucket {
                        members: vec![(other, other_pos), (index, pos)],
                    };
                }
                let branch = Cell::Branch {
                    center_of_mass: Pos2::ZERO,
                    count: 0,
                    children: Box::default(),
                };
                let branch = Self::insert_into_branch(branch, other, other_pos, bounds, depth);
                Self::insert_into_branch(branch, index, pos, bounds, depth)
            }

            Cell::Bucket { mut members } => {
                members.push((index, pos));
                Cell::Bucket { members }
            }

            branch @ Cell::Branch { .. } => {
                Self::insert_into_branch(branch, index, pos, bounds, depth)
            }
        }
    }

    fn insert_into_branch(cell: Cell, index: usize, pos: Pos2, bounds: Rect, depth: u32) -> Cell {
        let (center_of_mass, count, mut children) = match cell {
            Cell::Branch {
                center_of_mass,
                count,
                children,
            } => (center_of_mass, count, children),
            other => return other,
        };

        let q = quadrant(bounds, pos);
        let child = std::mem::take(&mut children[q]);
        children[q] = Self::insert(child, index, pos, child_bounds(bounds, q), depth + 1);

        let total = count as f32 + 1.0;
        Cell::Branch {
            center_of_mass: Pos2::new(
                (center_of_mass.x * count as f32 + pos.x) / total,
                (center_of_mass.y * count as f32 + pos.y) / total,
            ),
            count: count + 1,
            children,
        }
    }

    /// Total repulsion on body `index` located at `pos`, excluding itself.
    pub fn repulsion_on(&self, index: usize, pos: Pos2, strength: f32, min_distance: f32) -> Vec2 {
        let mut force = Vec2::ZERO;
        self.accumulate(&self.root, self.bounds, index, pos, strength, min_distance, &mut force);
        force
    }

    #[allow(clippy::too_many_arguments)]
    fn accumulate(
        &self,
        cell: &Cell,
        bounds: Rect,
        index: usize,
        pos: Pos2,
        strength: f32,
        min_distance: f32,
        force: &mut Vec2,
    ) {
        match cell {
            Cell::Empty => {}

            Cell::Leaf { index: other, pos: other_pos } => {
                if *other != index {
                    *force += pair_repulsion(index, pos, *other, *other_pos, strength, min_distance);
                }
            }

            Cell::Bucket { members } => {
                for &(other, other_pos) in members {
                    if other != index {
                        *force +=
                            pair_repulsion(index, pos, other, other_pos, strength, min_distance);
                    }
                }
            }

            Cell::Branch {
                center_of_mass,
                count,
                children,
            } => {
                let delta = pos - *center_of_mass;
                let len = delta.length();
                // Opening criterion: far enough cells act as one charge. A body sitting
                // on the centre of mass always opens the cell.
                if len > 0.0 && bounds.width() / len < self.theta {
                    let distance = len.max(min_distance);
                    *force += (delta / len) * (strength * *count as f32 / (distance * distance));
                } else {
                    for (q, child) in children.iter().enumerate() {
                        self.accumulate(
                            child,
                            child_bounds(bounds, q),
                            index,
                            pos,
                            strength,
                            min_distance,
                            force,
                        );
                    }
                }
            }
        }
    }
}
