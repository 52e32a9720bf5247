use relnotes::{
    GitHub, cli::handle_clap_help_version, cli::init_tracing, collect_milestone_notes,
    get_github_token, parse_milestone_notes_args, render_milestone_notes,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let spec = match parse_milestone_notes_args(std::env::args()) {
        Ok(spec) => spec,
        Err(err) => {
            if let Some(clap_err) = err.downcast_ref::<clap::Error>() {
                handle_clap_help_version(clap_err);
            } else {
                return Err(err);
            }
        }
    };

    let github = GitHub::new(get_github_token()?)?;
    let notes = collect_milestone_notes(&spec, &github).await?;

    render_milestone_notes(&notes, &mut std::io::stdout().lock())
}
