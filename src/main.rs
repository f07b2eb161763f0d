fn main() -> anyhow::Result<()> {
    drawscreen_lib::run()
}
