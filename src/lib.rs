pub mod configuration;

pub mod quadrature {
    pub mod ruletable;
    pub mod embeddedpair;
    pub mod integrationframe;
    pub mod integrationreport;
    pub mod quadratureerror;
    pub mod supervisor;
    pub mod adaptivequadrature;
    pub mod vsvoquadrature;
    pub mod integrator;
}

pub use quadrature::integrator::{
    integrate,
    integrate_with_report,
    Integrator
};
