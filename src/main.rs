use std::path::PathBuf;

use structopt::StructOpt;

use ghget::Config;

#[derive(Debug, StructOpt)]
#[structopt(name = "ghget", about = "Fetch a GitHub repository snapshot, no git required")]
struct Opt {
    /// Repository reference, e.g. github.com/owner/name
    repository: String,
    /// The target directory to clone into
    #[structopt(short, long)]
    dir: Option<PathBuf>,
    /// Git branch to clone
    #[structopt(short, long)]
    branch: Option<String>,
    /// Git tag to clone
    #[structopt(short, long)]
    tag: Option<String>,
    /// Git commit hash to clone
    #[structopt(short, long)]
    commit: Option<String>,
    /// If the target directory already exists, forcefully write files into it
    #[structopt(short, long)]
    force: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let opt = Opt::from_args();
    let config = Config {
        dir: opt.dir,
        branch: opt.branch,
        tag: opt.tag,
        commit: opt.commit,
        force: opt.force,
    };
    let result = ghget::clone(&opt.repository, &config)?;
    println!(
        "Cloned {}/{} ({}) into {}",
        result.repo_owner,
        result.repo_name,
        result.repo_fragment,
        result.target_dir_rel.display(),
    );
    Ok(())
}
