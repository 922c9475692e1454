fn main() -> anyhow::Result<()> {
    tile_forge_app::main()
}
