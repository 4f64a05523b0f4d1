pub fn execute(_args: &[&str]) -> Result<(), String> {
    println!(
        "VaultPay commands\n\
         \n\
         \x20 login <email> <password>                    Sign in\n\
         \x20 register <first> <last> <email> <aadhaar> <password> [phone]\n\
         \x20                                             Create an account\n\
         \x20 logout                                      Sign out\n\
         \x20 profile [reveal]                            Profile card (alias: me)\n\
         \x20 balance                                     Wallet balance (alias: bal)\n\
         \x20 history [page]                              Transaction history (alias: tx)\n\
         \x20 send <email> <amount>                       Transfer money (alias: transfer)\n\
         \x20 watch | unwatch                             Toggle live balance updates\n\
         \x20 quit                                        Leave the console"
    );
    Ok(())
}
