fn main() {
    std::process::exit(shree_lodge_lib::run());
}
