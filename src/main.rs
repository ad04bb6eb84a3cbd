fn main() {
    if let Err(err) = ran_graph_layout::run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
