use std::cell::RefCell;
use std::f32::consts::PI;

use approx::{
    assert_abs_diff_eq,
    assert_relative_eq
};

use compquad::integrate;
use compquad::integrate_with_report;
use compquad::quadrature::adaptivequadrature::adapt4_with_report;
use compquad::quadrature::integrationreport::Engine;
use compquad::quadrature::integrator::MIN_PRECISION;
use compquad::quadrature::vsvoquadrature::vsvo_with_report;

const PRECISIONS: [f32; 8] = [1e-1, 1e-2, 1e-3, 1e-4, 1e-5, 1e-6, 1e-7, 0.0];

struct Smooth {
    name: &'static str,
    f: fn(f64) -> f64,
    a: f32,
    b: f32,
    antiderivative: fn(f64) -> f64,
}

impl Smooth {
    fn exact(&self) -> f64 {
        (self.antiderivative)(self.b as f64) - (self.antiderivative)(self.a as f64)
    }
}

fn smooth_functions() -> Vec<Smooth> {
    vec![
        Smooth { name: "sin", f: |x| x.sin(), a: 0.0, b: PI, antiderivative: |x| -x.cos() },
        Smooth { name: "exp", f: |x| x.exp(), a: 0.0, b: 1.0, antiderivative: |x| x.exp() },
        Smooth { name: "runge", f: |x| 1.0 / (1.0 + x * x), a: 0.0, b: 1.0, antiderivative: |x| x.atan() },
        Smooth { name: "cos", f: |x| x.cos(), a: 0.0, b: 10.0, antiderivative: |x| x.sin() },
        Smooth { name: "sin long", f: |x| x.sin(), a: 0.0, b: 10.0, antiderivative: |x| -x.cos() },
        Smooth { name: "sin longer", f: |x| x.sin(), a: 0.0, b: 100.0, antiderivative: |x| -x.cos() },
        Smooth { name: "exp wide", f: |x| x.exp(), a: 0.0, b: 10.0, antiderivative: |x| x.exp() },
        Smooth {
            name: "osc",
            f: |x| x.exp() * (7.0 * x).cos(),
            a: 0.0,
            b: 3.0,
            antiderivative: |x| x.exp() * ((7.0 * x).cos() + 7.0 * (7.0 * x).sin()) / 50.0,
        },
        Smooth {
            name: "log1p",
            f: |x| x.ln_1p(),
            a: 0.0,
            b: 5.0,
            antiderivative: |x| (x + 1.0) * x.ln_1p() - x,
        },
        Smooth {
            name: "quintic",
            f: |x| x.powi(5) - 2.0 * x * x + 1.0,
            a: -1.0,
            b: 2.0,
            antiderivative: |x| x.powi(6) / 6.0 - 2.0 * x.powi(3) / 3.0 + x,
        },
    ]
}

#[test]
fn test_degenerate_interval_is_zero() {
    for precision in PRECISIONS {
        assert_eq!(integrate(|x: f64| x.sin(), 0.75, 0.75, precision), 0.0);
        assert_eq!(integrate(|x: f64| 1.0 / x, -2.0, -2.0, precision), 0.0);
    }
}

#[test]
fn test_constant_on_every_path() {
    for precision in PRECISIONS {
        let value = integrate(|_x: f64| 3.5_f32, -1.0, 2.0, precision);
        assert_relative_eq!(value, 10.5, max_relative = 1e-6);
    }
    for precision in [1e-2_f32, 1e-6] {
        assert_relative_eq!(adapt4_with_report(|_x: f64| -2.0_f32, 0.0, 4.0, precision).value(), -8.0);
        assert_relative_eq!(vsvo_with_report(|_x: f64| -2.0_f32, 0.0, 4.0, precision).value(), -8.0);
    }
}

#[test]
fn test_cubic_regardless_of_engine() {
    assert_eq!(integrate(|x: f64| x * x * x, 0.0, 1.0, 1e-3), 0.25);
    for precision in PRECISIONS {
        let report = integrate_with_report(|x: f64| x * x * x, 0.0, 1.0, precision);
        assert_abs_diff_eq!(report.value(), 0.25, epsilon = 1e-6);
    }
}

#[test]
fn test_sine_scenario() {
    let value = integrate(|x: f64| x.sin(), 0.0, PI, 1e-6);
    assert_abs_diff_eq!(value, 2.0, epsilon = 1e-5);

    // f32 取樣值
    let value = integrate(|x: f64| (x as f32).sin(), 0.0, PI, 1e-6);
    assert_abs_diff_eq!(value, 2.0, epsilon = 1e-5);
}

#[test]
fn test_dispatcher_routing_matches_engine_pattern() {
    fn record(precision: f32, engine: fn(&dyn Fn(f64) -> f64, f32) -> Vec<f64>) -> (Vec<f64>, Vec<f64>) {
        let points = RefCell::new(Vec::new());
        let f = |x: f64| {
            points.borrow_mut().push(x);
            x.exp() * (3.0 * x).cos()
        };
        let _ = integrate(f, 0.0, 2.0, precision);
        let dispatched = points.take();
        let direct = engine(&|x: f64| x.exp() * (3.0 * x).cos(), precision);
        (dispatched, direct)
    }

    fn traced_adapt4(f: &dyn Fn(f64) -> f64, precision: f32) -> Vec<f64> {
        let points = RefCell::new(Vec::new());
        let _ = adapt4_with_report(
            |x: f64| {
                points.borrow_mut().push(x);
                f(x)
            },
            0.0,
            2.0,
            precision.max(MIN_PRECISION),
        );
        points.take()
    }

    fn traced_vsvo(f: &dyn Fn(f64) -> f64, precision: f32) -> Vec<f64> {
        let points = RefCell::new(Vec::new());
        let _ = vsvo_with_report(
            |x: f64| {
                points.borrow_mut().push(x);
                f(x)
            },
            0.0,
            2.0,
            precision.max(MIN_PRECISION),
        );
        points.take()
    }

    for precision in [1.0_f32, 1e-2, 1e-3, 1e-4] {
        let (dispatched, direct) = record(precision, traced_adapt4);
        assert_eq!(dispatched, direct, "precision {}", precision);
        assert_eq!((dispatched.len() - 1) % 4, 0);
    }
    for precision in [9.99e-5_f32, 1e-5, 1e-7, 0.0] {
        let (dispatched, direct) = record(precision, traced_vsvo);
        assert_eq!(dispatched, direct, "precision {}", precision);
        assert_eq!((dispatched.len() - 1) % 8, 0);
    }
}

#[test]
fn test_engine_reported() {
    let f = |x: f64| x.exp();
    assert_eq!(integrate_with_report(f, 0.0, 1.0, 1e-4).engine(), Engine::Adaptive4);
    assert_eq!(integrate_with_report(f, 0.0, 1.0, 1e-5).engine(), Engine::Vsvo);
    assert_eq!(integrate_with_report(f, 0.0, 1.0, -3.0).engine(), Engine::Vsvo);
}

#[test]
fn test_realized_error_within_tolerance() {
    for smooth in smooth_functions() {
        let exact = smooth.exact();
        for precision in PRECISIONS {
            let value = integrate(smooth.f, smooth.a, smooth.b, precision) as f64;
            let bound = precision.max(MIN_PRECISION) as f64 + 8.0 * f32::EPSILON as f64 * exact.abs();
            assert!(
                (value - exact).abs() <= bound,
                "{} at precision {}: error {:e} > {:e}",
                smooth.name,
                precision,
                (value - exact).abs(),
                bound
            );
        }
    }
}

#[test]
fn test_iteration_count_bounded() {
    for smooth in smooth_functions() {
        for precision in PRECISIONS {
            let report = integrate_with_report(smooth.f, smooth.a, smooth.b, precision);
            assert!(report.iterations() < 10_000, "{} at precision {}", smooth.name, precision);
            assert_eq!(report.iterations(), report.accepted() + report.rejected());
        }
    }
}

#[test]
fn test_concurrent_calls_are_independent() {
    let expected = integrate(|x: f64| x.exp(), 0.0, 1.0, 1e-6);
    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| scope.spawn(|| integrate(|x: f64| x.exp(), 0.0, 1.0, 1e-6)))
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), expected);
        }
    });
}
