use ndarray::arr2;
use optdoe_doe::{FullFactorial, SamplingMethod, generate_candidate_set};

fn main() {
    println!("*** 3 levels grid within [-1, 1]^2");
    let candidates = generate_candidate_set::<f64>(2, 3);
    println!("{candidates}\n");

    let xlimits = arr2(&[[0., 1.], [-10., 10.], [5., 15.]]);
    println!("*** explicit levels grid within");
    println!("{xlimits}\n");
    let candidates = FullFactorial::new(&xlimits).levels(&[2, 3, 2]);
    println!("{candidates}\n");

    let n = 10;
    println!("*** {n} points of a balanced full-factorial grid");
    let samples = FullFactorial::new(&xlimits).sample(n);
    println!("{samples}");
}
