use linfa::ParamGuard;
use optdoe_doe::generate_candidate_set;
use optdoe_optimal::{optimal_design, Criterion, Method, OptimalDesignParams};

fn main() {
    let env = env_logger::Env::new().filter_or("OPTDOE_LOG", "info");
    let mut builder = env_logger::Builder::from_env(env);
    let builder = builder.target(env_logger::Target::Stdout);
    builder.try_init().ok();

    // 5 levels by factor within [-1, 1]^2
    let candidates = generate_candidate_set::<f64>(2, 5);

    println!("D-optimal designs of 8 runs for a quadratic model in 2 factors");
    for method in Method::ALL {
        let params = OptimalDesignParams::new(8, 2)
            .criterion(Criterion::D)
            .method(method)
            .check()
            .expect("valid parameters");
        let (design, info) = optimal_design(&candidates, &params).expect("optimal design");
        println!(
            "{method:>16}: det(X^T.X) = {:>8.1}, D-eff = {:>5.1}%, A-eff = {:>5.1}%, iterations = {}",
            info.det_xtx, info.d_eff, info.a_eff, info.iterations
        );
        println!("{design}");
    }
}
