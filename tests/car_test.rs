//! Car kinematics, control and damage tests

use rand::rngs::StdRng;
use rand::SeedableRng;

use self_driving_sim::simulation::{
    car_polygon, CarId, CarUpdateResult, Controls, LevelData, NeuralNetwork, Point, Polygon,
    Segment, Sensor, SimCar, SimError, SimRoad,
};

const WIDTH: f64 = 30.0;
const HEIGHT: f64 = 50.0;

fn input_car(x: f64, y: f64) -> SimCar {
    SimCar::input(CarId(0), Point::new(x, y), WIDTH, HEIGHT)
}

fn drive(car: &mut SimCar, controls: Controls) {
    car.set_controls(controls).unwrap();
    car.update(&[], &[]).unwrap();
}

/// Single-level brain that always outputs forward only
fn forward_only_brain(ray_count: usize) -> NeuralNetwork {
    NeuralNetwork::from_levels(vec![LevelData {
        inputs: vec![0.0; ray_count],
        outputs: vec![0.0; 4],
        biases: vec![-1.0, 0.0, 0.0, 0.0],
        weights: vec![vec![0.0; 4]; ray_count],
    }])
    .unwrap()
}

#[test]
fn test_new_car_has_footprint_and_no_motion() {
    let car = input_car(100.0, 200.0);

    assert_eq!(car.speed, 0.0);
    assert_eq!(car.angle, 0.0);
    assert!(!car.is_damaged());
    assert_eq!(car.polygon(), &car_polygon(Point::new(100.0, 200.0), 0.0, WIDTH, HEIGHT));
}

#[test]
fn test_friction_slows_car_to_a_stop() {
    let mut car = input_car(0.0, 0.0);
    car.speed = 1.0;
    let friction = car.profile.friction;

    car.update(&[], &[]).unwrap();
    assert_eq!(car.speed, 1.0 - friction);
    assert!(car.position.y < 0.0);

    let mut previous = car.speed;
    for _ in 0..100 {
        car.update(&[], &[]).unwrap();
        if previous >= friction * 2.0 {
            assert_eq!(car.speed, previous - friction);
        }
        assert!(car.speed >= 0.0);
        previous = car.speed;
    }
    assert_eq!(car.speed, 0.0);

    let resting = car.position;
    car.update(&[], &[]).unwrap();
    assert_eq!(car.speed, 0.0);
    assert_eq!(car.position, resting);
    assert_eq!(car.angle, 0.0);
}

#[test]
fn test_small_speed_snaps_to_zero() {
    let mut car = input_car(0.0, 0.0);
    car.speed = -0.03;
    car.update(&[], &[]).unwrap();
    assert_eq!(car.speed, 0.0);
}

#[test]
fn test_speed_above_max_is_clamped() {
    let mut car = input_car(0.0, 0.0);
    car.speed = 10.0;
    car.update(&[], &[]).unwrap();
    assert_eq!(car.speed, car.profile.max_speed - car.profile.friction);

    let mut reversing = input_car(0.0, 0.0);
    reversing.speed = -10.0;
    reversing.update(&[], &[]).unwrap();
    assert_eq!(
        reversing.speed,
        -reversing.profile.max_reverse_speed + reversing.profile.friction
    );
}

#[test]
fn test_forward_accelerates_towards_negative_y() {
    let mut car = input_car(0.0, 0.0);
    drive(
        &mut car,
        Controls {
            forward: true,
            ..Controls::default()
        },
    );

    let expected = car.profile.acceleration - car.profile.friction;
    assert_eq!(car.speed, expected);
    assert_eq!(car.position.x, 0.0);
    assert_eq!(car.position.y, -expected);
}

#[test]
fn test_reverse_moves_towards_positive_y() {
    let mut car = input_car(0.0, 0.0);
    drive(
        &mut car,
        Controls {
            reverse: true,
            ..Controls::default()
        },
    );

    assert!(car.speed < 0.0);
    assert!(car.position.y > 0.0);
}

#[test]
fn test_left_turn_scales_with_speed() {
    let mut car = input_car(0.0, 0.0);
    drive(
        &mut car,
        Controls {
            forward: true,
            left: true,
            ..Controls::default()
        },
    );

    let profile = car.profile;
    let expected = profile.rotation_modifier * (profile.acceleration / profile.max_speed);
    assert!((car.angle - expected).abs() < 1e-15);
    assert!(car.position.x < 0.0);
}

#[test]
fn test_left_and_right_cancel() {
    let mut car = input_car(0.0, 0.0);
    drive(
        &mut car,
        Controls {
            forward: true,
            left: true,
            right: true,
            ..Controls::default()
        },
    );
    assert_eq!(car.angle, 0.0);
}

#[test]
fn test_turning_without_speed_does_nothing() {
    let mut car = input_car(0.0, 0.0);
    drive(
        &mut car,
        Controls {
            left: true,
            ..Controls::default()
        },
    );
    assert_eq!(car.angle, 0.0);
    assert_eq!(car.position, Point::new(0.0, 0.0));
}

#[test]
fn test_scripted_car_keeps_driving_forward() {
    let mut rng = StdRng::seed_from_u64(9);
    let mut car = SimCar::scripted(CarId(1), Point::new(0.0, 0.0), WIDTH, HEIGHT, &mut rng);

    assert!((0.7..1.3).contains(&car.profile.max_speed));
    assert!(car.controls().forward);

    for _ in 0..50 {
        car.update(&[], &[]).unwrap();
    }

    assert!(car.controls().forward);
    assert!(!car.controls().reverse);
    assert!(car.speed > 0.0);
    assert!(car.speed <= car.profile.max_speed);
    assert!(car.position.y < 0.0);
}

#[test]
fn test_only_input_cars_accept_external_controls() {
    let mut rng = StdRng::seed_from_u64(9);
    let mut scripted = SimCar::scripted(CarId(1), Point::new(0.0, 0.0), WIDTH, HEIGHT, &mut rng);

    assert_eq!(
        scripted.set_controls(Controls::default()),
        Err(SimError::ControlsNotExternal)
    );
    assert!(scripted.controls().forward);
}

#[test]
fn test_border_contact_damages_car() {
    let road = SimRoad::new(100.0, 200.0, 3).unwrap();
    let mut car = input_car(road.left + 10.0, 0.0);

    let result = car.update(road.borders(), &[]).unwrap();

    assert_eq!(result, CarUpdateResult::Crashed);
    assert!(car.is_damaged());
}

#[test]
fn test_damage_is_permanent() {
    let road = SimRoad::new(100.0, 200.0, 3).unwrap();
    let mut car = input_car(road.left + 10.0, 0.0);
    car.update(road.borders(), &[]).unwrap();
    assert!(car.is_damaged());

    car.position = Point::new(road.x, 0.0);
    for _ in 0..10 {
        let result = car.update(road.borders(), &[]).unwrap();
        assert_eq!(result, CarUpdateResult::Continue);
        assert!(car.is_damaged());
    }
}

#[test]
fn test_traffic_contact_damages_car() {
    let road = SimRoad::new(100.0, 200.0, 3).unwrap();
    let mut car = input_car(road.x, 0.0);
    let other = car_polygon(Point::new(road.x + 10.0, -20.0), 0.0, WIDTH, HEIGHT);

    car.update(road.borders(), &[&other]).unwrap();
    assert!(car.is_damaged());
}

#[test]
fn test_clear_road_leaves_car_intact() {
    let road = SimRoad::new(100.0, 200.0, 3).unwrap();
    let mut car = input_car(road.x, 0.0);
    let far = car_polygon(Point::new(road.x, -500.0), 0.0, WIDTH, HEIGHT);

    for _ in 0..20 {
        assert_eq!(
            car.update(road.borders(), &[&far]).unwrap(),
            CarUpdateResult::Continue
        );
    }
    assert!(!car.is_damaged());
}

#[test]
fn test_network_driven_car_takes_controls_from_brain() {
    let sensor = Sensor::new(HEIGHT);
    let brain = forward_only_brain(sensor.ray_count());
    let mut car =
        SimCar::network_driven(CarId(2), Point::new(0.0, 0.0), WIDTH, HEIGHT, sensor, brain)
            .unwrap();

    assert_eq!(car.controls(), Controls::default());

    car.update(&[], &[]).unwrap();
    assert_eq!(car.speed, 0.0);
    assert_eq!(
        car.controls(),
        Controls {
            forward: true,
            ..Controls::default()
        }
    );

    car.update(&[], &[]).unwrap();
    assert!(car.speed > 0.0);
    assert_eq!(car.sensor().map(|sensor| sensor.readings().len()), Some(7));
}

#[test]
fn test_network_driven_car_sees_traffic() {
    let sensor = Sensor::new(HEIGHT);
    let brain = forward_only_brain(sensor.ray_count());
    let mut car =
        SimCar::network_driven(CarId(2), Point::new(0.0, 0.0), WIDTH, HEIGHT, sensor, brain)
            .unwrap();
    let ahead: Polygon = car_polygon(Point::new(0.0, -100.0), 0.0, WIDTH, HEIGHT);
    let borders = [Segment::new(Point::new(-500.0, -1e6), Point::new(-500.0, 1e6))];

    car.update(&borders, &[&ahead]).unwrap();

    let sensor = car.sensor().expect("network-driven cars carry a sensor");
    let middle = sensor.readings()[3].expect("middle ray hits the car ahead");
    assert!((middle.y - -75.0).abs() < 1e-9);
    assert!((middle.offset - 0.5).abs() < 1e-9);
}

#[test]
fn test_brain_must_fit_sensor_and_controls() {
    let mut rng = StdRng::seed_from_u64(2);
    let sensor = Sensor::new(HEIGHT);
    let brain = NeuralNetwork::new(&[5, 7, 4], &mut rng).unwrap();

    let origin = Point::new(0.0, 0.0);
    let result = SimCar::network_driven(CarId(3), origin, WIDTH, HEIGHT, sensor, brain);
    assert!(matches!(result, Err(SimError::InvalidNetwork(_))));
}
