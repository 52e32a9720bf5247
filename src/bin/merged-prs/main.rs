use relnotes::{
    GitHub, cli::handle_clap_help_version, cli::init_tracing, collect_merged_prs,
    parse_merged_prs_args, render_merged_prs,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let (token, spec) = match parse_merged_prs_args(std::env::args()) {
        Ok(result) => result,
        Err(err) => {
            if let Some(clap_err) = err.downcast_ref::<clap::Error>() {
                handle_clap_help_version(clap_err);
            } else {
                return Err(err);
            }
        }
    };

    let github = GitHub::new(token)?;
    let report = collect_merged_prs(&spec, &github).await?;

    render_merged_prs(&report, &mut std::io::stdout().lock())
}
