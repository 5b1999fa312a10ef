// External services states talk to
//
// - remote_config.rs: remote values with defaults, staged fetch and activation
// - crash.rs: crash reporting and analytics interfaces with logging defaults

pub mod crash;
pub mod remote_config;

pub use crash::{Analytics, CrashReporter, EventValue, LoggingAnalytics, LoggingCrashReporter};
pub use remote_config::{ConfigSource, FileConfigSource, RemoteConfig, StaticConfigSource};

/// Fire-and-forget collaborators bundled for the game context
pub struct Services {
    pub crash: Box<dyn CrashReporter>,
    pub analytics: Box<dyn Analytics>,
}

impl Services {
    pub fn new(crash: Box<dyn CrashReporter>, analytics: Box<dyn Analytics>) -> Self {
        Services { crash, analytics }
    }
}

impl Default for Services {
    fn default() -> Self {
        Services {
            crash: Box::new(LoggingCrashReporter),
            analytics: Box::new(LoggingAnalytics),
        }
    }
}
