pub mod dataset;
pub mod loop_fn;
pub mod step;
pub mod train_config;
pub mod trainer;

pub use dataset::{Dataset, Sample};
pub use loop_fn::train_loop;
pub use step::{TrainStep, TrainSummary};
pub use train_config::{NetworkConfig, RunConfig, TrainConfig};
pub use trainer::{evaluate, train_network};
