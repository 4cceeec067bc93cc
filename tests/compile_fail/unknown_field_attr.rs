use scriptbind::NativeClass;

#[derive(NativeClass)]
struct Player {
    #[script(get, readonly)]
    hp: u32,
}

fn main() {}
