fn main() -> Result<(), mod_vault_lib::models::error::SError> {
    mod_vault_lib::run()
}
