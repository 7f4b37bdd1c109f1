//! Car kinematics for the driving simulation
//!
//! A car integrates its pose from four boolean controls once per tick,
//! rebuilds its footprint and checks it against the road borders and the
//! traffic it was handed. Network-driven cars then sense and decide their
//! controls for the next tick.

use rand::Rng;

use super::controls::Controls;
use super::error::SimError;
use super::geometry::{polygon_touches_segment, polygons_intersect};
use super::network::NeuralNetwork;
use super::polygon::car_polygon;
use super::sensor::Sensor;
use super::types::{lerp, CarId, Point, Polygon, Segment};

/// Number of network outputs: forward, reverse, left, right
pub const CONTROL_OUTPUTS: usize = 4;

/// Result of a car update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CarUpdateResult {
    /// Car is still intact, or was already damaged before this tick
    Continue,
    /// Car became damaged during this tick
    Crashed,
}

/// Fixed kinematic constants of a car
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KinematicProfile {
    pub acceleration: f64,
    pub max_speed: f64,
    pub max_reverse_speed: f64,
    pub rotation_modifier: f64,
    pub friction: f64,
}

impl KinematicProfile {
    const ROTATION_MODIFIER: f64 = 0.0125;
    const FRICTION: f64 = 0.05;
    const REVERSE_RATIO: f64 = 0.68;

    pub fn with_speed(acceleration: f64, max_speed: f64) -> Self {
        Self {
            acceleration,
            max_speed,
            max_reverse_speed: max_speed * Self::REVERSE_RATIO,
            rotation_modifier: Self::ROTATION_MODIFIER,
            friction: Self::FRICTION,
        }
    }

    /// Slow traffic with a top speed somewhere in `[0.7, 1.3)`
    pub fn scripted<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::with_speed(0.1, rng.random_range(0.7..1.3))
    }

    pub fn driven() -> Self {
        Self::with_speed(1.0, 2.3)
    }
}

/// What drives a car, and the equipment that comes with it
#[derive(Debug, Clone)]
pub enum CarKind {
    /// Traffic with the throttle held down
    Scripted,
    /// Controls come from the network reading the sensor
    NetworkDriven {
        sensor: Sensor,
        brain: NeuralNetwork,
    },
    /// Controls are injected from outside every tick
    Input,
}

/// A car in the driving simulation
#[derive(Debug, Clone)]
pub struct SimCar {
    pub id: CarId,
    pub position: Point,
    /// Heading in radians; 0 faces -y
    pub angle: f64,
    pub speed: f64,
    pub width: f64,
    pub height: f64,
    pub profile: KinematicProfile,
    damaged: bool,
    controls: Controls,
    kind: CarKind,
    polygon: Polygon,
}

impl SimCar {
    pub fn new(
        id: CarId,
        position: Point,
        width: f64,
        height: f64,
        kind: CarKind,
        profile: KinematicProfile,
    ) -> Self {
        let controls = match kind {
            CarKind::Scripted => Controls::scripted(),
            CarKind::NetworkDriven { .. } | CarKind::Input => Controls::default(),
        };

        Self {
            id,
            position,
            angle: 0.0,
            speed: 0.0,
            width,
            height,
            profile,
            damaged: false,
            controls,
            kind,
            polygon: car_polygon(position, 0.0, width, height),
        }
    }

    pub fn scripted<R: Rng + ?Sized>(
        id: CarId,
        position: Point,
        width: f64,
        height: f64,
        rng: &mut R,
    ) -> Self {
        Self::new(
            id,
            position,
            width,
            height,
            CarKind::Scripted,
            KinematicProfile::scripted(rng),
        )
    }

    /// Network-driven car; the brain must take one input per sensor ray and
    /// produce [`CONTROL_OUTPUTS`] outputs
    pub fn network_driven(
        id: CarId,
        position: Point,
        width: f64,
        height: f64,
        sensor: Sensor,
        brain: NeuralNetwork,
    ) -> Result<Self, SimError> {
        let topology = brain.topology();
        if topology.first() != Some(&sensor.ray_count())
            || topology.last() != Some(&CONTROL_OUTPUTS)
        {
            return Err(SimError::InvalidNetwork(format!(
                "topology {:?} does not fit {} rays and {} controls",
                topology,
                sensor.ray_count(),
                CONTROL_OUTPUTS
            )));
        }

        Ok(Self::new(
            id,
            position,
            width,
            height,
            CarKind::NetworkDriven { sensor, brain },
            KinematicProfile::driven(),
        ))
    }

    pub fn input(id: CarId, position: Point, width: f64, height: f64) -> Self {
        Self::new(
            id,
            position,
            width,
            height,
            CarKind::Input,
            KinematicProfile::driven(),
        )
    }

    pub fn kind(&self) -> &CarKind {
        &self.kind
    }

    pub fn is_network_driven(&self) -> bool {
        matches!(self.kind, CarKind::NetworkDriven { .. })
    }

    /// Once set, never cleared
    pub fn is_damaged(&self) -> bool {
        self.damaged
    }

    pub fn controls(&self) -> Controls {
        self.controls
    }

    /// Footprint at the current pose
    pub fn polygon(&self) -> &Polygon {
        &self.polygon
    }

    pub fn sensor(&self) -> Option<&Sensor> {
        match &self.kind {
            CarKind::NetworkDriven { sensor, .. } => Some(sensor),
            CarKind::Scripted | CarKind::Input => None,
        }
    }

    pub fn brain(&self) -> Option<&NeuralNetwork> {
        match &self.kind {
            CarKind::NetworkDriven { brain, .. } => Some(brain),
            CarKind::Scripted | CarKind::Input => None,
        }
    }

    pub fn brain_mut(&mut self) -> Option<&mut NeuralNetwork> {
        match &mut self.kind {
            CarKind::NetworkDriven { brain, .. } => Some(brain),
            CarKind::Scripted | CarKind::Input => None,
        }
    }

    /// Feed controls from an external input source
    pub fn set_controls(&mut self, controls: Controls) -> Result<(), SimError> {
        match self.kind {
            CarKind::Input => {
                self.controls = controls;
                Ok(())
            }
            CarKind::Scripted | CarKind::NetworkDriven { .. } => Err(SimError::ControlsNotExternal),
        }
    }

    /// Advance the car by one tick
    ///
    /// `traffic` holds the footprints this car can hit and see; it must not
    /// include the car's own footprint.
    pub fn update(
        &mut self,
        borders: &[Segment],
        traffic: &[&Polygon],
    ) -> Result<CarUpdateResult, SimError> {
        let was_damaged = self.damaged;

        self.move_car();
        self.polygon = car_polygon(self.position, self.angle, self.width, self.height);

        if !self.damaged {
            self.damaged = self.assess_damage(borders, traffic);
        }

        if let CarKind::NetworkDriven { sensor, brain } = &mut self.kind {
            sensor.update(self.position, self.angle, borders, traffic);
            let outputs = brain.feed_forward(&sensor.offsets())?;
            self.controls.apply_outputs(&outputs);
        }

        if self.damaged && !was_damaged {
            Ok(CarUpdateResult::Crashed)
        } else {
            Ok(CarUpdateResult::Continue)
        }
    }

    fn assess_damage(&self, borders: &[Segment], traffic: &[&Polygon]) -> bool {
        borders
            .iter()
            .any(|border| polygon_touches_segment(&self.polygon, border))
            || traffic
                .iter()
                .any(|other| polygons_intersect(&self.polygon, other))
    }

    fn move_car(&mut self) {
        let Controls {
            forward,
            reverse,
            left,
            right,
        } = self.controls;
        let profile = self.profile;

        if forward {
            self.speed += profile.acceleration;
        }
        if reverse {
            self.speed -= profile.acceleration;
        }

        if self.speed != 0.0 {
            let top_speed = if self.speed > 0.0 {
                profile.max_speed
            } else {
                profile.max_reverse_speed
            };
            // Turning flips while reversing, like a real steering wheel
            let turn = lerp(0.0, profile.rotation_modifier, self.speed / top_speed);

            if left {
                self.angle += turn;
            }
            if right {
                self.angle -= turn;
            }
        }

        if self.speed > profile.max_speed {
            self.speed = profile.max_speed;
        }
        if self.speed < -profile.max_reverse_speed {
            self.speed = -profile.max_reverse_speed;
        }

        if self.speed > 0.0 {
            self.speed -= profile.friction;
        } else if self.speed < 0.0 {
            self.speed += profile.friction;
        }
        if self.speed.abs() < profile.friction {
            self.speed = 0.0;
        }

        self.position = self.position.project(self.angle, self.speed);
    }
}
