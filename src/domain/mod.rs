// Domain layer - Pure models and plot transforms
pub mod freqmode;
pub mod geo;
pub mod level1;
pub mod level2;
pub mod plot_data;
pub mod selector;
pub mod statistics;
