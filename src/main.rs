use blendgroups::ui::output;

fn main() {
    if let Err(err) = blendgroups::cli::run() {
        output::error(format!("{:#}", err));
        std::process::exit(1);
    }
}
