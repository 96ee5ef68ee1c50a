use protoperson::pipeline::{self, PipelineSettings};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let settings = PipelineSettings::default();
    if let Err(err) = pipeline::run(&settings) {
        log::error!("{err}");
        std::process::exit(1);
    }
}
