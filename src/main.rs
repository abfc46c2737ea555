fn main() {
    bert::run_cli();
}
