use grid_vrp::solver::run;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    run::run()
}
