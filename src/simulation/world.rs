//! Simulation world that ties the road, the traffic and the agents together
//!
//! One [`SimWorld`] is one generation: a set of network-driven agents racing
//! through the same scripted traffic. Agents never interact with each other;
//! they only see and hit the road borders and the traffic cars.
//!
//! Ordering within a tick: every traffic footprint is snapshotted before any
//! car moves, and all damage checks and sensor readings in that tick run
//! against the snapshot. Update order therefore never changes the outcome.

use anyhow::{Context, Result};
use log::{debug, info, warn};
use ordered_float::OrderedFloat;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::car::{CarUpdateResult, SimCar};
use super::config::SimConfig;
use super::controls::Controls;
use super::network::{LevelData, NeuralNetwork};
use super::road::SimRoad;
use super::sensor::Sensor;
use super::types::{CarId, Point, Polygon};

/// Aggregate counters for one run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunStats {
    pub ticks: u64,
    /// Agents damaged so far
    pub damaged_agents: usize,
    /// Traffic cars damaged so far
    pub damaged_traffic: usize,
    /// Distance from the start line to the best agent
    pub best_distance: f64,
}

/// What happened during a single tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    pub tick: u64,
    /// Agents that became damaged this tick
    pub crashed_agents: Vec<CarId>,
    /// Traffic cars that became damaged this tick
    pub crashed_traffic: Vec<CarId>,
}

/// The main simulation world
pub struct SimWorld {
    pub road: SimRoad,

    /// Cars under network or input control
    pub agents: Vec<SimCar>,

    /// Scripted traffic
    pub traffic: Vec<SimCar>,

    pub stats: RunStats,

    config: SimConfig,

    /// Spawn positions of the traffic, in spawn order
    traffic_layout: Vec<Point>,

    seed: u64,
    rng: StdRng,
    next_id: usize,
}

impl SimWorld {
    /// Empty world: a road and nothing on it
    pub fn new(config: SimConfig) -> Result<Self> {
        let road = SimRoad::new(config.road_x, config.road_width, config.lane_count)
            .context("Failed to build road")?;

        let seed = config.seed.unwrap_or_else(|| rand::rng().random());
        info!("Simulation seed: {}", seed);

        Ok(Self {
            road,
            agents: Vec::new(),
            traffic: Vec::new(),
            stats: RunStats::default(),
            config,
            traffic_layout: Vec::new(),
            seed,
            rng: StdRng::seed_from_u64(seed),
            next_id: 0,
        })
    }

    /// A full generation: agents on the start line and traffic ahead of them
    ///
    /// With a saved `best_brain` the first agent drives it unchanged and the
    /// rest drive mutated copies. With saved `traffic` positions the traffic is
    /// placed exactly there instead of in random lanes.
    pub fn generation(
        config: SimConfig,
        best_brain: Option<Vec<LevelData>>,
        traffic: Option<Vec<Point>>,
    ) -> Result<Self> {
        let mut world = Self::new(config)?;

        match traffic {
            Some(positions) => {
                for position in positions {
                    world.add_traffic_car(position);
                }
            }
            None => world.generate_traffic(),
        }

        world.spawn_agents(best_brain)?;

        info!(
            "Generation ready: {} agents, {} traffic cars, {} lanes",
            world.agents.len(),
            world.traffic.len(),
            world.road.lane_count()
        );

        Ok(world)
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    fn next_car_id(&mut self) -> CarId {
        let id = CarId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Start position shared by every agent: middle lane, on the start line
    pub fn start_position(&self) -> Point {
        let middle = (self.road.lane_count() / 2) as i64;
        Point::new(self.road.lane_center(middle), self.config.start_y)
    }

    pub fn add_traffic_car(&mut self, position: Point) -> CarId {
        let id = self.next_car_id();
        let car = SimCar::scripted(
            id,
            position,
            self.config.car_width,
            self.config.car_height,
            &mut self.rng,
        );
        self.traffic.push(car);
        self.traffic_layout.push(position);
        id
    }

    /// Place `traffic_count` cars in random lanes, one every `traffic_spacing`
    /// ahead of the start line
    pub fn generate_traffic(&mut self) {
        let lane_count = self.road.lane_count();
        for i in 0..self.config.traffic_count {
            let lane = self.rng.random_range(0..lane_count) as i64;
            let y = self.config.start_y - self.config.traffic_spacing * (i + 1) as f64;
            let position = Point::new(self.road.lane_center(lane), y);
            self.add_traffic_car(position);
        }
    }

    /// Add a network-driven agent on the start line
    pub fn add_agent(&mut self, brain: NeuralNetwork) -> Result<CarId> {
        let id = self.next_car_id();
        let sensor = Sensor::with_config(
            self.config.ray_count,
            self.config.ray_length(),
            self.config.ray_spread,
        );
        let car = SimCar::network_driven(
            id,
            self.start_position(),
            self.config.car_width,
            self.config.car_height,
            sensor,
            brain,
        )
        .with_context(|| format!("Failed to create agent {:?}", id))?;
        self.agents.push(car);
        Ok(id)
    }

    /// Add an agent driven by external input on the start line
    pub fn add_input_car(&mut self) -> CarId {
        let id = self.next_car_id();
        let car = SimCar::input(
            id,
            self.start_position(),
            self.config.car_width,
            self.config.car_height,
        );
        self.agents.push(car);
        id
    }

    /// Fill the start line with `agent_count` network-driven agents
    pub fn spawn_agents(&mut self, best_brain: Option<Vec<LevelData>>) -> Result<()> {
        let topology = self.config.brain_topology();

        let seed_brain = match best_brain {
            Some(levels) => {
                let brain = NeuralNetwork::from_levels_with_topology(levels, &topology)
                    .context("Saved brain cannot drive this configuration")?;
                info!(
                    "Seeding {} agents from saved brain, mutation amount {}",
                    self.config.agent_count, self.config.mutation_amount
                );
                Some(brain)
            }
            None => None,
        };

        for i in 0..self.config.agent_count {
            let brain = match &seed_brain {
                Some(seed_brain) => {
                    let mut brain = seed_brain.clone();
                    if i != 0 {
                        brain.mutate(self.config.mutation_amount, &mut self.rng);
                    }
                    brain
                }
                None => NeuralNetwork::new(&topology, &mut self.rng)?,
            };
            self.add_agent(brain)?;
        }

        Ok(())
    }

    pub fn agent(&self, id: CarId) -> Option<&SimCar> {
        self.agents.iter().find(|car| car.id == id)
    }

    /// Feed external controls to an input-driven agent
    pub fn set_input_controls(&mut self, id: CarId, controls: Controls) -> Result<()> {
        let car = self
            .agents
            .iter_mut()
            .find(|car| car.id == id)
            .with_context(|| format!("Agent {:?} not found", id))?;
        car.set_controls(controls)
            .with_context(|| format!("Agent {:?} rejected external controls", id))
    }

    /// Advance every car by one tick
    pub fn tick(&mut self) -> Result<TickReport> {
        self.stats.ticks += 1;
        let mut report = TickReport {
            tick: self.stats.ticks,
            ..TickReport::default()
        };

        let snapshot: Vec<Polygon> = self
            .traffic
            .iter()
            .map(|car| car.polygon().clone())
            .collect();
        let borders = self.road.borders();

        for (index, car) in self.traffic.iter_mut().enumerate() {
            let others: Vec<&Polygon> = snapshot
                .iter()
                .enumerate()
                .filter(|(other, _)| *other != index)
                .map(|(_, polygon)| polygon)
                .collect();

            let result = car
                .update(borders, &others)
                .with_context(|| format!("Failed to update traffic car {:?}", car.id))?;
            if result == CarUpdateResult::Crashed {
                debug!("Traffic car {:?} damaged at tick {}", car.id, report.tick);
                report.crashed_traffic.push(car.id);
            }
        }

        let traffic: Vec<&Polygon> = snapshot.iter().collect();
        for car in &mut self.agents {
            let result = car
                .update(borders, &traffic)
                .with_context(|| format!("Failed to update agent {:?}", car.id))?;
            if result == CarUpdateResult::Crashed {
                debug!("Agent {:?} damaged at tick {}", car.id, report.tick);
                report.crashed_agents.push(car.id);
            }
        }

        self.stats.damaged_agents += report.crashed_agents.len();
        self.stats.damaged_traffic += report.crashed_traffic.len();
        if let Some(best) = self.best_agent() {
            self.stats.best_distance = self.config.start_y - best.position.y;
        }

        Ok(report)
    }

    /// The network-driven agent that got farthest up the road, preferring
    /// undamaged ones
    pub fn best_agent(&self) -> Option<&SimCar> {
        let candidates = || self.agents.iter().filter(|car| car.is_network_driven());

        candidates()
            .filter(|car| !car.is_damaged())
            .min_by_key(|car| OrderedFloat(car.position.y))
            .or_else(|| candidates().min_by_key(|car| OrderedFloat(car.position.y)))
    }

    /// Parameters of the best agent's brain, ready for [`super::store::SimStore`]
    pub fn export_best_brain(&self) -> Option<Vec<LevelData>> {
        self.best_agent()
            .and_then(SimCar::brain)
            .map(NeuralNetwork::to_levels)
    }

    /// Where the traffic of this run was spawned
    pub fn traffic_layout(&self) -> &[Point] {
        &self.traffic_layout
    }

    pub fn all_agents_damaged(&self) -> bool {
        self.agents.iter().all(SimCar::is_damaged)
    }

    /// Print a summary of the world state
    pub fn print_summary(&self) {
        let active = self.agents.iter().filter(|car| !car.is_damaged()).count();
        println!("=== Simulation Summary (tick {}) ===", self.stats.ticks);
        println!(
            "Agents: {} ({} active, {} damaged)",
            self.agents.len(),
            active,
            self.stats.damaged_agents
        );
        println!(
            "Traffic: {} ({} damaged)",
            self.traffic.len(),
            self.stats.damaged_traffic
        );

        match self.best_agent() {
            Some(best) => println!(
                "Best agent {:?}: lane={}, position=({:.1}, {:.1}), speed={:.2}, distance={:.1}{}",
                best.id.0,
                self.road.lane_of(best.position.x),
                best.position.x,
                best.position.y,
                best.speed,
                self.stats.best_distance,
                if best.is_damaged() { " [damaged]" } else { "" }
            ),
            None => warn!("No agents in the world"),
        }
    }

    /// Draw the stretch of road around the best agent in the terminal
    pub fn draw_map(&self) {
        const ROWS: usize = 24;
        const COLS_PER_LANE: usize = 6;
        const UNITS_PER_ROW: f64 = 25.0;

        let lane_count = self.road.lane_count();
        let width = lane_count * COLS_PER_LANE + 2;
        let focus_y = self
            .best_agent()
            .map_or(self.config.start_y, |car| car.position.y);
        // Best agent sits two thirds of the way down the view
        let top_y = focus_y - UNITS_PER_ROW * (ROWS as f64 * 2.0 / 3.0);

        let mut grid = vec![vec![' '; width]; ROWS];

        for row in grid.iter_mut() {
            row[0] = '|';
            row[width - 1] = '|';
            for lane in 1..lane_count {
                row[lane * COLS_PER_LANE] = ':';
            }
        }

        let to_grid = |position: &Point| -> Option<(usize, usize)> {
            let row = ((position.y - top_y) / UNITS_PER_ROW).floor();
            let across = (position.x - self.road.left) / self.road.width;
            let col = (across * (width - 2) as f64).floor();
            if row < 0.0 || row >= ROWS as f64 || col < 0.0 || col >= (width - 2) as f64 {
                return None;
            }
            Some((row as usize, col as usize + 1))
        };

        for car in &self.traffic {
            if let Some((row, col)) = to_grid(&car.position) {
                grid[row][col] = if car.is_damaged() { 'X' } else { 'T' };
            }
        }

        let best_id = self.best_agent().map(|car| car.id);
        for car in &self.agents {
            if let Some((row, col)) = to_grid(&car.position) {
                let symbol = if Some(car.id) == best_id {
                    '@'
                } else if car.is_damaged() {
                    'x'
                } else {
                    'a'
                };
                if grid[row][col] != '@' {
                    grid[row][col] = symbol;
                }
            }
        }

        println!("\n=== Road Map ===");
        println!("Legend: @=Best agent, a=Agent, x=Damaged agent, T=Traffic, X=Damaged traffic");
        println!();
        for row in &grid {
            let line: String = row.iter().collect();
            println!("{}", line);
        }
        println!();
    }
}
