#[macro_use]
mod common;

#[cfg(test)]
mod _while {
    tests! {
        class_in_body:
        "while (true) class Foo {}"
        => ERR "[line 1:14] Error at 'class': Expect expression."
    }

    tests! {
        closure_in_body:
        "var f1; var f2; var f3; var i = 1; \
         while (i < 4) { var j = i; fun f() { print j; } \
         if (j == 1) f1 = f; else if (j == 2) f2 = f; else f3 = f; i = i + 1; } \
         f1(); f2(); f3();"
        => OK "1", "2", "3"
    }

    tests! {
        fun_in_body:
        "while (true) fun foo() {}"
        => ERR "[line 1:14] Error at 'fun': Expect expression."
    }

    tests! {
        return_closure:
        "fun f() { while (true) { var i = \"i\"; fun g() { print i; } return g; } } var h = f(); h();"
        => OK "i"
    }

    tests! {
        return_inside:
        "fun f() { while (true) { var i = \"i\"; return i; } } print f();"
        => OK "i"
    }

    tests! {
        syntax:
        "var c = 0; while (c < 3) print c = c + 1; \
         var a = 0; while (a < 3) { print a; a = a + 1; }"
        => OK "1", "2", "3", "0", "1", "2"
    }

    tests! {
        var_in_body:
        "while (true) var foo;"
        => ERR "[line 1:14] Error at 'var': Expect expression."
    }
}
