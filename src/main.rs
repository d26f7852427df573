fn main() -> anyhow::Result<()> {
    rbackup::cli::run()
}
