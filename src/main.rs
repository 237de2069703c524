use std::f64::consts::{
    E,
    PI
};

use env_logger::{
    Builder,
    Env
};

use compquad::configuration::IntegratorConfig;
use compquad::quadrature::integrator::Integrator;

struct Reference {
    name: &'static str,
    f: fn(f64) -> f64,
    a: f32,
    b: f32,
    exact: f64,
}

fn main() {
    Builder::from_env(Env::default().default_filter_or("info")).init();

    let config = match std::env::args().nth(1) {
        Some(config_path) => match IntegratorConfig::from_reader(config_path) {
            Ok(config) => config,
            Err(error) => {
                log::error!("{}", error);
                return;
            }
        },
        None => IntegratorConfig::default(),
    };
    let integrator = Integrator::new(config);

    let references = [
        Reference { name: "sin", f: |x| x.sin(), a: 0.0, b: PI as f32, exact: 2.0 },
        Reference { name: "exp", f: |x| x.exp(), a: 0.0, b: 1.0, exact: E - 1.0 },
        Reference { name: "x^3", f: |x| x.powi(3), a: 0.0, b: 1.0, exact: 0.25 },
        Reference { name: "1/(1+x^2)", f: |x| 1.0 / (1.0 + x * x), a: 0.0, b: 1.0, exact: PI / 4.0 },
        Reference {
            name: "e^x cos7x",
            f: |x| x.exp() * (7.0 * x).cos(),
            a: 0.0,
            b: 3.0,
            exact: (3.0_f64.exp() * (21.0_f64.cos() + 7.0 * 21.0_f64.sin()) - 1.0) / 50.0,
        },
        Reference { name: "sqrt", f: |x| x.sqrt(), a: 0.0, b: 1.0, exact: 2.0 / 3.0 },
    ];
    let precisions = [1e-2_f32, 1e-4, 1e-6, 0.0];

    println!("{:<10} {:>9} {:>8} {:>14} {:>11} {:>6}", "f", "precision", "engine", "value", "error", "evals");
    for reference in &references {
        for &precision in &precisions {
            match integrator.try_integrate(reference.f, reference.a, reference.b, precision) {
                Ok(report) => {
                    if let Ok(json) = serde_json::to_string(&report) {
                        log::debug!("{}: {}", reference.name, json);
                    }
                    println!(
                        "{:<10} {:>9.1e} {:>8} {:>14.9} {:>11.3e} {:>6}",
                        reference.name,
                        precision,
                        format!("{:?}", report.engine()),
                        report.value(),
                        (report.value() as f64 - reference.exact).abs(),
                        report.evaluations()
                    );
                }
                Err(error) => println!("{:<10} {:>9.1e} failed: {}", reference.name, precision, error),
            }
        }
    }
}
