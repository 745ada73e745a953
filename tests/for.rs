#[macro_use]
mod common;

#[cfg(test)]
mod _for {
    tests! {
        class_in_body:
        "for (var i = 0; i < 1; i = i + 1) class Foo {}"
        => ERR "[line 1:35] Error at 'class': Expect expression."
    }

    tests! {
        closure_in_body:
        "var f1; var f2; var f3; \
         for (var i = 1; i <= 3; i = i + 1) { var j = i; fun f() { print i; print j; } \
         if (i == 1) f1 = f; else if (i == 2) f2 = f; else f3 = f; } \
         f1(); f2(); f3();"
        => OK "4", "1", "4", "2", "4", "3"
    }

    tests! {
        fun_in_body:
        "for (var i = 0; i < 1; i = i + 1) fun foo() {}"
        => ERR "[line 1:35] Error at 'fun': Expect expression."
    }

    tests! {
        return_closure:
        "fun f() { for (;;) { var i = \"i\"; fun g() { print i; } return g; } } var h = f(); h();"
        => OK "i"
    }

    tests! {
        return_inside:
        "fun f() { for (;;) { var i = \"i\"; return i; } } print f();"
        => OK "i"
    }
}
