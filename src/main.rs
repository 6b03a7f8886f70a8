fn main() -> anyhow::Result<()> {
    filter_analyzer::run()
}
