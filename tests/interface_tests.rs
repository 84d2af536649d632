use approx::assert_relative_eq;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use planewave::field::{Domain, FieldSampler};
use planewave::interface::{InterfaceSolver, Polarization};
use planewave::medium::{Excitation, Medium};
use planewave::problem::{InterfaceState, Problem};
use planewave::propagation::PropagationConstants;
use planewave::settings;

fn ghz() -> Excitation {
    Excitation::new(1e9, 1.0).unwrap()
}

fn dielectrics(eps_r1: f64, eps_r2: f64) -> InterfaceSolver {
    InterfaceSolver::from_media(
        &Medium::lossless_dielectric(eps_r1, 1.0).unwrap(),
        &Medium::lossless_dielectric(eps_r2, 1.0).unwrap(),
        &ghz(),
    )
    .unwrap()
}

#[test]
fn power_is_conserved_for_random_dielectric_pairs() {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    for _ in 0..500 {
        let eps_r1 = rng.random_range(1.0..10.0);
        let eps_r2 = rng.random_range(1.0..10.0);
        let mu_r1 = rng.random_range(1.0..4.0);
        let mu_r2 = rng.random_range(1.0..4.0);
        let theta = rng.random_range(0.0..89.9);
        let solver = InterfaceSolver::from_media(
            &Medium::lossless_dielectric(eps_r1, mu_r1).unwrap(),
            &Medium::lossless_dielectric(eps_r2, mu_r2).unwrap(),
            &ghz(),
        )
        .unwrap();
        for pol in [Polarization::S, Polarization::P] {
            let result = solver.solve(theta, pol).unwrap();
            assert!(
                (result.reflectance + result.transmittance - 1.0).abs() < 1e-6,
                "eps_r = ({}, {}), mu_r = ({}, {}), theta = {}, {:?}",
                eps_r1,
                eps_r2,
                mu_r1,
                mu_r2,
                theta,
                result
            );
            assert!((0.0..=1.0).contains(&result.reflectance));
            assert!((0.0..=1.0).contains(&result.transmittance));
        }
    }
}

#[test]
fn normal_incidence_is_polarization_independent() {
    let solver = dielectrics(1.0, 4.0);
    let s = solver.solve(0.0, Polarization::S).unwrap();
    let p = solver.solve(0.0, Polarization::P).unwrap();
    assert_relative_eq!(s.reflection, -1.0 / 3.0, epsilon = 1e-9);
    assert_relative_eq!(p.reflection, -1.0 / 3.0, epsilon = 1e-9);
    assert_relative_eq!(s.reflectance, 1.0 / 9.0, epsilon = 1e-9);
    assert_relative_eq!(s.transmittance, 8.0 / 9.0, epsilon = 1e-9);
    assert_relative_eq!(s.theta_t.unwrap(), 0.0);
}

#[test]
fn pec_reflects_everything_at_every_angle() {
    let solver = dielectrics(1.0, 2.25).with_pec(true);
    for theta in [0.0, 15.0, 45.0, 80.0, 89.9] {
        for pol in [Polarization::S, Polarization::P] {
            let result = solver.solve(theta, pol).unwrap();
            assert_eq!(result.reflection, -1.0);
            assert_eq!(result.transmission, 0.0);
            assert_eq!(result.reflectance, 1.0);
            assert_eq!(result.transmittance, 0.0);
            assert!(result.is_pec);
            assert!(result.theta_t.is_none());
        }
    }
}

#[test]
fn tir_boundary_for_glass_to_air() {
    let solver = dielectrics(2.25, 1.0);
    let critical = solver.critical_angle().unwrap().to_degrees();
    assert_relative_eq!(critical, 41.8103, epsilon = 1e-3);

    let below = solver.solve(41.80, Polarization::S).unwrap();
    assert!(!below.is_tir);
    assert!(below.transmittance > 0.0);

    let above = solver.solve(41.82, Polarization::S).unwrap();
    assert!(above.is_tir);
    assert_eq!(above.reflectance, 1.0);
    assert_eq!(above.transmittance, 0.0);
    assert!(above.theta_t.is_none());
}

#[test]
fn brewster_angle_for_air_to_glass() {
    let solver = dielectrics(1.0, 2.25);
    let brewster = solver.brewster_angle().unwrap().to_degrees();
    assert_relative_eq!(brewster, 56.3099, epsilon = 1e-3);

    let p = solver.solve(brewster, Polarization::P).unwrap();
    assert!(p.reflection.abs() < 1e-9, "Gamma = {}", p.reflection);
    assert!(p.near_brewster);
    assert_relative_eq!(p.transmittance, 1.0, epsilon = 1e-9);

    let s = solver.solve(brewster, Polarization::S).unwrap();
    assert!(s.reflectance > 0.1);
    assert!(s.brewster_angle.is_none());
    assert!(!s.near_brewster);
}

#[test]
fn free_space_constants() {
    let pc = PropagationConstants::solve(&Medium::free_space(), &ghz());
    assert_eq!(pc.alpha(), 0.0);
    assert_relative_eq!(pc.beta(), 20.944, max_relative = 1e-3);
    assert_relative_eq!(pc.eta_magnitude(), 376.73, max_relative = 1e-4);
    assert_relative_eq!(pc.phase_velocity().unwrap(), 2.998e8, max_relative = 1e-3);
    assert_relative_eq!(pc.wavelength().unwrap(), 0.2998, max_relative = 1e-3);
}

#[test]
fn copper_at_one_gigahertz() {
    let cu = Medium::good_conductor(5.8e7, 1.0).unwrap();
    let pc = PropagationConstants::solve(&cu, &ghz());
    assert_relative_eq!(pc.alpha(), 338_359.88, max_relative = 1e-6);
    assert_relative_eq!(pc.skin_depth().unwrap(), 2.9554e-6, max_relative = 1e-4);
    assert_relative_eq!(pc.eta_magnitude(), 8.2502e-3, max_relative = 1e-4);
    assert_eq!(pc.eta_phase_deg(), 45.0);

    let solver = InterfaceSolver::from_media(&Medium::free_space(), &cu, &ghz()).unwrap();
    let result = solver.solve(20.0, Polarization::P).unwrap();
    assert!(result.is_pec);
    assert_eq!(result.reflectance, 1.0);
}

#[test]
fn field_sampling_is_idempotent() {
    let pc = PropagationConstants::solve(&Medium::lossless_dielectric(4.0, 1.0).unwrap(), &ghz());
    let domain = Domain::Space {
        t: 0.25e-9,
        start: -0.3,
        end: 0.3,
    };
    let a = FieldSampler::new(pc, ghz(), domain).unwrap().trace();
    let b = FieldSampler::new(pc, ghz(), domain).unwrap().trace();
    assert_eq!(a, b);
    assert_eq!(a.coordinate[0], -0.3);
    assert_eq!(a.coordinate[a.coordinate.len() - 1], 0.3);
}

#[test]
fn air_to_glass_at_thirty_degrees() {
    let solver = InterfaceSolver::from_media(
        &Medium::free_space(),
        &Medium::lossless_dielectric(2.25, 1.0).unwrap(),
        &ghz(),
    )
    .unwrap();
    assert_relative_eq!(solver.transmitted().eta_magnitude(), 251.15, max_relative = 1e-4);

    let p = solver.solve(30.0, Polarization::P).unwrap();
    assert_relative_eq!(p.theta_t_deg().unwrap(), 19.4712, epsilon = 1e-3);
    assert_relative_eq!(p.reflection, -0.1589, epsilon = 1e-3);
    assert_relative_eq!(p.reflectance, 0.02525, epsilon = 1e-4);
    assert_relative_eq!(p.transmittance, 0.97475, epsilon = 1e-4);
    assert!(!p.is_tir);
    assert!(!p.is_pec);
    assert!(!p.near_brewster);
}

#[test]
fn default_configuration_runs_end_to_end() {
    let settings = settings::load_default_config().unwrap();
    let mut problem = Problem::new(settings).unwrap();
    problem.solve().unwrap();
    let solution = problem.solution().unwrap();
    match &solution.interface {
        InterfaceState::Solved { result, .. } => {
            assert_relative_eq!(result.reflection, -0.1589, epsilon = 1e-3);
        }
        InterfaceState::Disabled { reason } => panic!("interface disabled: {}", reason),
    }
}
