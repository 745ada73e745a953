#[macro_use]
mod common;

#[cfg(test)]
mod function {
    tests! {
        body_must_be_block:
        "fun f(a) 123;"
        => ERR "[line 1:10] Error at '123': Expect '{' before function body."
    }

    tests! {
        empty_body:
        "fun f() {} print f();"
        => OK "nil"
    }

    tests! {
        extra_arguments:
        "fun foo(a, b) { print a; print b; } foo(1, 2, 3, 4);"
        => ERR "[line 1:51] Runtime error: Expected 2 arguments but got 4."
    }

    tests! {
        local_mutual_recursion:
        "{ fun isEven(n) { if (n == 0) return true; return isOdd(n - 1); } \
         fun isOdd(n) { if (n == 0) return false; return isEven(n - 1); } isEven(4); }"
        => ERR "[line 1:51] Runtime error: Undefined variable 'isOdd'."
    }

    tests! {
        local_recursion:
        "{ fun fib(n) { if (n < 2) return n; return fib(n - 1) + fib(n - 2); } print fib(8); }"
        => OK "21"
    }

    tests! {
        missing_arguments:
        "fun foo(a, b) { print a; print b; } foo(1);"
        => ERR "[line 1:42] Runtime error: Expected 2 arguments but got 1."
    }

    tests! {
        missing_comma_in_parameters:
        "fun foo(a, b c) {}"
        => ERR "[line 1:14] Error at 'c': Expect ')' after parameters."
    }

    tests! {
        mutual_recursion:
        "fun isEven(n) { if (n == 0) return true; return isOdd(n - 1); } \
         fun isOdd(n) { if (n == 0) return false; return isEven(n - 1); } \
         print isEven(4); print isOdd(3);"
        => OK "true", "true"
    }

    tests! {
        nested_call_with_arguments:
        "fun returnArg(arg) { return arg; } \
         fun returnFunCallWithArg(func, arg) { return returnArg(func)(arg); } \
         fun printArg(arg) { print arg; } \
         print returnFunCallWithArg(printArg, \"hello world\");"
        => OK "hello world"
    }

    tests! {
        parameters:
        "fun f0() { return 0; } fun f1(a) { return a; } fun f2(a, b) { return a + b; } \
         fun f3(a, b, c) { return a + b + c; } fun f4(a, b, c, d) { return a + b + c + d; } \
         fun f5(a, b, c, d, e) { return a + b + c + d + e; } \
         fun f6(a, b, c, d, e, f) { return a + b + c + d + e + f; } \
         fun f7(a, b, c, d, e, f, g) { return a + b + c + d + e + f + g; } \
         fun f8(a, b, c, d, e, f, g, h) { return a + b + c + d + e + f + g + h; } \
         print f0(); print f1(1); print f2(1, 2); print f3(1, 2, 3); print f4(1, 2, 3, 4); \
         print f5(1, 2, 3, 4, 5); print f6(1, 2, 3, 4, 5, 6); print f7(1, 2, 3, 4, 5, 6, 7); \
         print f8(1, 2, 3, 4, 5, 6, 7, 8);"
        => OK "0", "1", "3", "6", "10", "15", "21", "28", "36"
    }

    tests! {
        print:
        "fun foo() {} print foo; print clock;"
        => OK "<fn foo>", "<native fn>"
    }

    tests! {
        recursion:
        "fun fib(n) { if (n < 2) return n; return fib(n - 1) + fib(n - 2); } print fib(8);"
        => OK "21"
    }
}
