use otp_core::signature;

pub fn run(package: &str, signatures: &[String]) {
    for hash in signature::app_signatures(package, signatures) {
        println!("{hash}");
    }
}
