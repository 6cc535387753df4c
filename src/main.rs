use std::error::Error;
use clap::Parser;
use rsa_msg::{RSA, SILENT};

fn main() -> Result<(), Box<dyn Error>> {
    let mut rsa = RSA::parse();
    if rsa.output == "stdout" && (rsa.mode == "encrypt" || rsa.mode == "decrypt") {
        rsa.silent = true;
    }
    if !SILENT.is_set()? { SILENT.set(rsa.silent)?; }
    if !rsa.silent { println!("Run args: {:?}", rsa); }
    rsa.run()?;
    Ok(())
}
