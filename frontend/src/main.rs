fn main() {
    bookmarks::platform::browser::start();
}
