fn main() -> anyhow::Result<()> {
    timemate_lib::run()
}
