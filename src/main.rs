use anyhow::Result;
use planewave::problem::Problem;
use planewave::settings;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let settings = settings::load_config()?;
    let mut problem = Problem::new(settings)?;

    problem.solve()?;
    println!("{}", problem);
    problem.writeup()?;

    Ok(())
}
