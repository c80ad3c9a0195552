//! Gap obstacles and the ordered track they scroll along.

use glam::IVec2;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use flappy_core::config::SimConfig;
use flappy_core::state::ObstacleView;
use flappy_core::types::Position;

use crate::silhouette::Silhouettes;

/// One vertical obstacle with a gap.
#[derive(Debug, Clone, PartialEq)]
pub struct Obstacle {
    /// Left edge.
    pub x: f64,
    pub gap_top: f64,
    pub gap_bottom: f64,
    /// Set once a surviving agent has moved past `x`.
    pub passed: bool,
}

impl Obstacle {
    pub fn new(x: f64, gap_top: f64, gap_size: f64) -> Self {
        Self {
            x,
            gap_top,
            gap_bottom: gap_top + gap_size,
            passed: false,
        }
    }

    /// Scroll left by `velocity`.
    pub fn step(&mut self, velocity: f64) {
        self.x -= velocity;
    }

    /// Whether the obstacle has fully left the screen.
    pub fn is_off_screen(&self, width: f64) -> bool {
        self.x + width < 0.0
    }

    /// Pixel-accurate test of the agent silhouette at `agent` against both halves.
    pub fn intersects(&self, silhouettes: &Silhouettes, agent: Position) -> bool {
        let top_y = self.gap_top - silhouettes.obstacle_top.height() as f64;
        let dx = (self.x - agent.x).round() as i32;
        let top = IVec2::new(dx, (top_y - agent.y).round() as i32);
        let bottom = IVec2::new(dx, (self.gap_bottom - agent.y).round() as i32);

        silhouettes
            .agent
            .overlap(&silhouettes.obstacle_bottom, bottom)
            .or_else(|| silhouettes.agent.overlap(&silhouettes.obstacle_top, top))
            .is_some()
    }

    pub fn view(&self, width: f64) -> ObstacleView {
        ObstacleView {
            x: self.x,
            width,
            gap_top: self.gap_top,
            gap_bottom: self.gap_bottom,
            passed: self.passed,
        }
    }
}

/// Live obstacles ordered by ascending x (spawn order).
#[derive(Debug, Clone)]
pub struct ObstacleTrack {
    obstacles: Vec<Obstacle>,
    width: f64,
}

impl ObstacleTrack {
    /// Empty track of obstacles `width` pixels wide.
    pub fn new(width: f64) -> Self {
        Self {
            obstacles: Vec::new(),
            width,
        }
    }

    /// Track from an explicit layout, sorted into ascending x.
    pub fn from_obstacles(width: f64, mut obstacles: Vec<Obstacle>) -> Self {
        obstacles.sort_by(|a, b| a.x.total_cmp(&b.x));
        Self { obstacles, width }
    }

    /// Track holding the episode's first obstacle.
    pub fn seeded(config: &SimConfig, width: f64, rng: &mut ChaCha8Rng) -> Self {
        let mut track = Self::new(width);
        track.spawn(config.first_obstacle_x, config, rng);
        track
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn len(&self) -> usize {
        self.obstacles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.obstacles.is_empty()
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn get(&self, index: usize) -> Option<&Obstacle> {
        self.obstacles.get(index)
    }

    /// Append an obstacle. Callers keep ascending x order.
    pub fn push(&mut self, obstacle: Obstacle) {
        self.obstacles.push(obstacle);
    }

    /// Spawn at `x` with a gap top drawn uniformly from the configured range.
    pub fn spawn(&mut self, x: f64, config: &SimConfig, rng: &mut ChaCha8Rng) -> &Obstacle {
        let gap_top = rng.gen_range(config.gap_top_min..config.gap_top_max) as f64;
        let index = self.obstacles.len();
        self.obstacles.push(Obstacle::new(x, gap_top, config.gap_size));
        &self.obstacles[index]
    }

    /// Index of the obstacle an agent at `agent_x` should sense: the first
    /// whose trailing edge is at or ahead of it, else the last one.
    pub fn sensed_index(&self, agent_x: f64) -> usize {
        self.obstacles
            .iter()
            .position(|o| agent_x <= o.x + self.width)
            .unwrap_or(self.obstacles.len().saturating_sub(1))
    }

    /// Scroll every obstacle.
    pub fn advance(&mut self, velocity: f64) {
        for obstacle in &mut self.obstacles {
            obstacle.step(velocity);
        }
    }

    /// Drop obstacles that have fully scrolled off. Returns how many.
    pub fn retire_off_screen(&mut self) -> usize {
        let before = self.obstacles.len();
        let width = self.width;
        self.obstacles.retain(|o| !o.is_off_screen(width));
        before - self.obstacles.len()
    }

    /// Mark every unpassed obstacle whose left edge is behind `agent_x`.
    /// Returns the number newly marked.
    pub fn mark_passed(&mut self, agent_x: f64) -> usize {
        let mut newly = 0;
        for obstacle in self.obstacles.iter_mut().filter(|o| !o.passed) {
            if obstacle.x < agent_x {
                obstacle.passed = true;
                newly += 1;
            }
        }
        newly
    }

    pub fn views(&self) -> Vec<ObstacleView> {
        self.obstacles.iter().map(|o| o.view(self.width)).collect()
    }
}
