fn main() {
    content_portal::server::run()
}
